use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::{documents, reviews};
use crate::state::AppState;

/// Review routes mounted at `/reviews`, including attached documents.
///
/// ```text
/// GET    /                         -> list_reviews
/// POST   /                         -> create_review (admin)
/// GET    /{id}                     -> get_review
/// PATCH  /{id}                     -> update_review (admin)
/// DELETE /{id}                     -> delete_review (admin)
/// GET    /{id}/document            -> download_document
/// POST   /{id}/document            -> upload_document (admin, multipart)
/// DELETE /{id}/document            -> delete_document (admin)
/// GET    /{id}/document/view       -> view_document
/// GET    /{id}/document/preview    -> preview_document
/// GET    /{id}/document/url        -> document_url
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::list_reviews).post(reviews::create_review))
        .route(
            "/{id}",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route(
            "/{id}/document",
            get(documents::download_document)
                .post(documents::upload_document)
                .delete(documents::delete_document)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/{id}/document/view", get(documents::view_document))
        .route("/{id}/document/preview", get(documents::preview_document))
        .route("/{id}/document/url", get(documents::document_url))
}
