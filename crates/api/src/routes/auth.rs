use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Auth routes mounted at `/auth`.
///
/// ```text
/// POST   /signup    -> signup
/// POST   /login     -> login
/// GET    /session   -> session
/// DELETE /logout    -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/session", get(auth::session))
        .route("/logout", delete(auth::logout))
}
