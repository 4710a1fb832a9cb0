use axum::routing::get;
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Article routes mounted at `/articles`.
///
/// ```text
/// GET    /       -> list_articles (?search=)
/// POST   /       -> create_article (admin)
/// GET    /{id}   -> get_article
/// PATCH  /{id}   -> update_article (admin)
/// DELETE /{id}   -> delete_article (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(articles::list_articles).post(articles::create_article))
        .route(
            "/{id}",
            get(articles::get_article)
                .patch(articles::update_article)
                .delete(articles::delete_article),
        )
}
