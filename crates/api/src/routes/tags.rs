use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Tag routes mounted at `/tags`.
///
/// ```text
/// GET    /                 -> list_tags (?prefix=&limit=&offset=)
/// POST   /                 -> create_tag (admin, create-or-get)
/// GET    /by-name/{name}   -> get_tag_by_name
/// GET    /{id}             -> get_tag
/// DELETE /{id}             -> delete_tag (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags).post(tags::create_tag))
        .route("/by-name/{name}", get(tags::get_tag_by_name))
        .route("/{id}", get(tags::get_tag).delete(tags::delete_tag))
}
