use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelnotes_catalog::CatalogError;
use reelnotes_core::error::CoreError;
use reelnotes_storage::StorageError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses:
/// `{ "error": message, "code": CODE }`, plus `"fields"` for per-field
/// validation failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `reelnotes_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An object storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A movie catalog failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A lookup by something other than id found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeds the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// A required upstream service is not configured or reachable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields: Option<&BTreeMap<String, String>> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidFields(map) => {
                    fields = Some(map);
                    (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        core.to_string(),
                    )
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal_error()
                }
            },

            // --- Infrastructure errors ---
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Storage(err) => classify_storage_error(err),
            AppError::Catalog(err) => classify_catalog_error(err),

            // --- HTTP-specific errors ---
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        };

        let body = match fields {
            Some(fields) => json!({
                "error": message,
                "code": code,
                "fields": fields,
            }),
            None => json!({
                "error": message,
                "code": code,
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn internal_error() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on `uq_*` constraints map to 409.
/// - CHECK violations on `ck_*` constraints map to 400.
/// - Foreign key violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                // check_violation
                Some("23514") if constraint.starts_with("ck_") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                // foreign_key_violation
                Some("23503") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Referenced row does not exist: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal_error()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}

fn classify_storage_error(err: &StorageError) -> Classified {
    match err {
        StorageError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Document file not found in storage".to_string(),
        ),
        StorageError::InvalidKey(key) => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            format!("Invalid document key: {key}"),
        ),
        StorageError::Unsupported(_) => (
            StatusCode::NOT_IMPLEMENTED,
            "NOT_IMPLEMENTED",
            err.to_string(),
        ),
        StorageError::Backend(msg) => {
            tracing::error!(error = %msg, "Object storage error");
            (
                StatusCode::BAD_GATEWAY,
                "STORAGE_ERROR",
                "Object storage request failed".to_string(),
            )
        }
        StorageError::Config(_) | StorageError::Io(_) => {
            tracing::error!(error = %err, "Object storage error");
            internal_error()
        }
    }
}

fn classify_catalog_error(err: &CatalogError) -> Classified {
    match err {
        CatalogError::ApiError { status, body } => {
            tracing::warn!(status, body = %body, "Movie catalog returned an error");
            (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "CATALOG_ERROR",
                format!("Failed to fetch movies. Status {status}"),
            )
        }
        CatalogError::Request(e) => {
            tracing::error!(error = %e, "Movie catalog request failed");
            (
                StatusCode::BAD_GATEWAY,
                "CATALOG_ERROR",
                "Movie catalog is unreachable".to_string(),
            )
        }
    }
}
