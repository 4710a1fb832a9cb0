use axum::routing::get;
use axum::Router;

use crate::handlers::movies;
use crate::state::AppState;

/// Movie routes mounted at `/movies`.
///
/// ```text
/// GET    /       -> list_movies
/// POST   /       -> create_movie (admin)
/// GET    /{id}   -> get_movie
/// PATCH  /{id}   -> update_movie (admin)
/// DELETE /{id}   -> delete_movie (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list_movies).post(movies::create_movie))
        .route(
            "/{id}",
            get(movies::get_movie)
                .patch(movies::update_movie)
                .delete(movies::delete_movie),
        )
}
