use axum::routing::post;
use axum::Router;

use crate::handlers::ratings;
use crate::state::AppState;

/// Bulk rating lookup mounted at `/movie-ratings`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(ratings::bulk_ratings))
}
