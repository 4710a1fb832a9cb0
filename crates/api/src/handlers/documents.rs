//! Handlers for document extraction and review attachments.
//!
//! Parsing runs on the blocking pool; storage calls are awaited inline.

use std::time::Duration;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use reelnotes_core::document::{
    preview, process_document, DocumentType, ExtractOptions, ExtractionFailure,
    ExtractionOutcome, OutputFormat,
};
use reelnotes_core::error::CoreError;
use reelnotes_core::naming::{generate_object_key, secure_filename};
use reelnotes_core::types::DbId;
use reelnotes_db::models::review::DocumentMetadata;
use reelnotes_db::repositories::ReviewRepo;
use reelnotes_storage::{ObjectStore, StorageError};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "document";

// ---------------------------------------------------------------------------
// Multipart form
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct UploadForm {
    filename: Option<String>,
    bytes: Vec<u8>,
    options: ExtractOptions,
    replace_text: bool,
}

impl UploadForm {
    /// The uploaded file, or `None` when no non-empty file part was sent.
    fn file(&self) -> Option<(&str, &[u8])> {
        match self.filename.as_deref() {
            Some(name) if !name.is_empty() && !self.bytes.is_empty() => {
                Some((name, self.bytes.as_slice()))
            }
            _ => None,
        }
    }
}

async fn read_upload_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                form.filename = field.file_name().map(str::to_string);
                form.bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
            }
            Some("format") => {
                let value = field.text().await.map_err(multipart_error)?;
                form.options.format = parse_format(&value)?;
            }
            Some("strip_title") => {
                let value = field.text().await.map_err(multipart_error)?;
                form.options.strip_title = parse_flag(&value);
            }
            Some("replace_text") => {
                let value = field.text().await.map_err(multipart_error)?;
                form.replace_text = parse_flag(&value);
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file is too large".into())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

fn parse_format(value: &str) -> AppResult<OutputFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "text" | "plain" => Ok(OutputFormat::Plain),
        "html" => Ok(OutputFormat::Html),
        other => Err(AppError::BadRequest(format!(
            "Unknown format '{other}'. Must be one of: text, html"
        ))),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Run [`process_document`] on the blocking pool.
///
/// A panicked or cancelled task is reported as a failed extraction.
pub(crate) async fn extract_in_background(
    bytes: Vec<u8>,
    filename: String,
    options: ExtractOptions,
) -> ExtractionOutcome {
    match tokio::task::spawn_blocking(move || process_document(&bytes, &filename, options)).await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "Document extraction task failed");
            ExtractionOutcome::Failed(ExtractionFailure::Parse("extraction task failed".into()))
        }
    }
}

/// Delete a stored blob, logging instead of failing.
pub(crate) async fn discard_blob(store: &dyn ObjectStore, key: &str) {
    if let Err(e) = store.delete(key).await {
        tracing::warn!(key, error = %e, "Failed to delete stored document");
    }
}

/// An attached document resolved from a review row.
struct Attachment {
    path: String,
    filename: String,
    file_type: Option<DocumentType>,
}

async fn find_attachment(state: &AppState, id: DbId) -> AppResult<Attachment> {
    let review = ReviewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))?;

    let Some(path) = review.document_path.clone().filter(|_| review.has_document) else {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }));
    };

    let file_type = review
        .document_type
        .as_deref()
        .and_then(|t| t.parse::<DocumentType>().ok());
    let filename = review
        .document_filename
        .as_deref()
        .map(secure_filename)
        .unwrap_or_else(|| secure_filename(&path));

    Ok(Attachment {
        path,
        filename,
        file_type,
    })
}

async fn serve_attachment(state: &AppState, id: DbId, disposition: &str) -> AppResult<Response> {
    let attachment = find_attachment(state, id).await?;
    let object = state.store.get(&attachment.path).await?;

    let content_type = object
        .content_type
        .or_else(|| attachment.file_type.map(|t| t.mime_type().to_string()))
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let content_disposition = format!("{disposition}; filename=\"{}\"", attachment.filename);

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, content_disposition),
        ],
        object.bytes,
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DocumentPreview {
    pub filename: String,
    pub file_type: Option<DocumentType>,
    pub preview: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentUrl {
    pub url: String,
    /// Seconds until a presigned URL expires; `None` for the view route.
    pub expires_in: Option<u64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/documents/extract
///
/// Multipart fields: `document` (file), `format` (`text` | `html`),
/// `strip_title` (bool). Responds with the extraction outcome; a failed
/// extraction is a 400 with `{ "success": false, "error" }`.
pub async fn extract_document(multipart: Multipart) -> AppResult<Response> {
    let form = read_upload_form(multipart).await?;

    let outcome = match form.file() {
        Some((filename, bytes)) => {
            extract_in_background(bytes.to_vec(), filename.to_string(), form.options).await
        }
        None => ExtractionOutcome::Failed(ExtractionFailure::Empty),
    };

    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(outcome)).into_response())
}

/// POST /api/v1/reviews/{id}/document
///
/// Attach (or replace) the document of a review. With `replace_text=true`
/// the extracted text becomes the review body; an extraction failure then
/// rejects the upload before anything is stored.
pub async fn upload_document(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let review = ReviewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))?;

    let form = read_upload_form(multipart).await?;
    let (filename, bytes) = form
        .file()
        .ok_or_else(|| AppError::BadRequest(ExtractionFailure::Empty.to_string()))?;
    let file_type = DocumentType::from_filename(filename)
        .ok_or_else(|| AppError::BadRequest(ExtractionFailure::UnsupportedType.to_string()))?;

    let replacement_text = if form.replace_text {
        let options = ExtractOptions {
            format: OutputFormat::Plain,
            strip_title: form.options.strip_title,
        };
        let extracted = extract_in_background(bytes.to_vec(), filename.to_string(), options)
            .await
            .into_result()
            .map_err(|failure| AppError::BadRequest(failure.to_string()))?;
        Some(extracted.text)
    } else {
        None
    };

    let key = generate_object_key(filename);
    state
        .store
        .put(&key, bytes.to_vec(), file_type.mime_type())
        .await?;

    let metadata = DocumentMetadata {
        filename: secure_filename(filename),
        path: key.clone(),
        file_type: file_type.as_str().to_string(),
    };
    let updated =
        match ReviewRepo::set_document(&state.pool, id, &metadata, replacement_text.as_deref())
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                discard_blob(state.store.as_ref(), &key).await;
                return Err(AppError::Core(CoreError::NotFound {
                    entity: "Review",
                    id,
                }));
            }
            Err(e) => {
                discard_blob(state.store.as_ref(), &key).await;
                return Err(e.into());
            }
        };

    if let Some(previous) = review.document_path.as_deref().filter(|p| *p != key) {
        discard_blob(state.store.as_ref(), previous).await;
    }

    tracing::info!(
        review_id = id,
        user_id = admin.user_id,
        key = %key,
        file_type = %file_type,
        replaced_text = replacement_text.is_some(),
        "Document attached",
    );

    let mut with_tags = ReviewRepo::attach_tags(&state.pool, vec![updated]).await?;
    let data = with_tags.pop().ok_or_else(|| {
        AppError::InternalError("attach_tags returned no rows".into())
    })?;

    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/reviews/{id}/document
pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    serve_attachment(&state, id, "attachment").await
}

/// GET /api/v1/reviews/{id}/document/view
pub async fn view_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    serve_attachment(&state, id, "inline").await
}

/// GET /api/v1/reviews/{id}/document/preview
///
/// First characters of the stored document's text.
pub async fn preview_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let attachment = find_attachment(&state, id).await?;
    let object = state.store.get(&attachment.path).await?;

    // The stored key keeps the original extension, which drives the parser.
    let extracted = extract_in_background(
        object.bytes,
        attachment.path.clone(),
        ExtractOptions::default(),
    )
    .await
    .into_result()
    .map_err(|failure| AppError::BadRequest(failure.to_string()))?;

    Ok(Json(DataResponse {
        data: DocumentPreview {
            filename: attachment.filename,
            file_type: attachment.file_type,
            preview: preview(&extracted.text),
        },
    }))
}

/// GET /api/v1/reviews/{id}/document/url
///
/// A presigned URL when the backend supports it, otherwise the view route.
pub async fn document_url(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let attachment = find_attachment(&state, id).await?;
    let expires_in = state.config.presign_expiry_secs;

    let data = match state
        .store
        .presign(&attachment.path, Duration::from_secs(expires_in))
        .await
    {
        Ok(url) => DocumentUrl {
            url,
            expires_in: Some(expires_in),
        },
        Err(StorageError::Unsupported(_)) => DocumentUrl {
            url: format!("/api/v1/reviews/{id}/document/view"),
            expires_in: None,
        },
        Err(e) => return Err(e.into()),
    };

    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/reviews/{id}/document
pub async fn delete_document(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let attachment = find_attachment(&state, id).await?;

    state.store.delete(&attachment.path).await?;
    ReviewRepo::clear_document(&state.pool, id).await?;

    tracing::info!(review_id = id, user_id = admin.user_id, "Document removed");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn flags_accept_common_truthy_values() {
        for v in ["true", "TRUE", "1", "yes", " on "] {
            assert!(parse_flag(v), "{v}");
        }
        for v in ["false", "0", "", "nope"] {
            assert!(!parse_flag(v), "{v}");
        }
    }

    #[test]
    fn format_parsing() {
        assert_eq!(parse_format("HTML").unwrap(), OutputFormat::Html);
        assert_eq!(parse_format("text").unwrap(), OutputFormat::Plain);
        assert_eq!(parse_format("").unwrap(), OutputFormat::Plain);
        assert_matches!(parse_format("markdown"), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn empty_file_part_counts_as_missing() {
        let form = UploadForm {
            filename: Some("a.pdf".into()),
            ..Default::default()
        };
        assert!(form.file().is_none());
    }

    #[tokio::test]
    async fn background_extraction_reports_unsupported_type() {
        let outcome =
            extract_in_background(b"data".to_vec(), "notes.txt".into(), ExtractOptions::default())
                .await;
        assert_matches!(
            outcome,
            ExtractionOutcome::Failed(ExtractionFailure::UnsupportedType)
        );
    }
}
