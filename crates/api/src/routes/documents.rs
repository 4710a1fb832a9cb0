use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Stateless document routes mounted at `/documents`.
///
/// ```text
/// POST   /extract   -> extract_document (multipart)
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().route(
        "/extract",
        post(documents::extract_document).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
}
