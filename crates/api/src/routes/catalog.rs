use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Movie catalog proxy mounted at `/catalog`.
///
/// ```text
/// GET    /movies     -> catalog_movies (?search=&page=)
/// GET    /discover   -> catalog_discover (?genre_id=&search=&page=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies", get(catalog::catalog_movies))
        .route("/discover", get(catalog::catalog_discover))
}
