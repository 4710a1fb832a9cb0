//! Handlers for `/tags`.
//!
//! Names are normalized (trimmed, lowercased) before every write and lookup.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use reelnotes_core::error::CoreError;
use reelnotes_core::tag::{normalize_tag_name, validate_tag_name};
use reelnotes_core::types::DbId;
use reelnotes_db::models::tag::{CreateTag, TagListParams};
use reelnotes_db::repositories::TagRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
///
/// Alphabetical; `?prefix=` narrows to suggestions.
pub async fn list_tags(
    State(state): State<AppState>,
    Query(params): Query<TagListParams>,
) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/tags
///
/// Create-or-get: 201 for a new tag, 200 when the name already exists.
pub async fn create_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    let name = validate_tag_name(&input.name)?;

    if let Some(existing) = TagRepo::find_by_name(&state.pool, &name).await? {
        return Ok((StatusCode::OK, Json(DataResponse { data: existing })));
    }

    let tag = TagRepo::create_or_get(&state.pool, &name).await?;
    tracing::info!(tag_id = tag.id, name = %tag.name, user_id = admin.user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// GET /api/v1/tags/by-name/{name}
pub async fn get_tag_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_name(&state.pool, &name)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Tag '{}' not found", normalize_tag_name(&name)))
        })?;
    Ok(Json(DataResponse { data: tag }))
}

/// GET /api/v1/tags/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Tag", id }))?;
    Ok(Json(DataResponse { data: tag }))
}

/// DELETE /api/v1/tags/{id}
///
/// Removes the tag from every review it was attached to.
pub async fn delete_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TagRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Tag", id }));
    }

    tracing::info!(tag_id = id, user_id = admin.user_id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
