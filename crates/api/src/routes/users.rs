use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User routes mounted at `/users`.
///
/// ```text
/// GET    /{id}   -> get_user
/// PATCH  /{id}   -> update_user (self or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(users::get_user).patch(users::update_user))
}
