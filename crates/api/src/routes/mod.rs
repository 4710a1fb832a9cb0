pub mod articles;
pub mod auth;
pub mod catalog;
pub mod documents;
pub mod health;
pub mod movies;
pub mod ratings;
pub mod reviews;
pub mod search;
pub mod seo;
pub mod tags;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// `max_upload_bytes` bounds the multipart upload routes.
///
/// ```text
/// /auth/signup                          signup (public)
/// /auth/login                           login (public)
/// /auth/session                         current user or 204
/// /auth/logout                          logout (stateless)
///
/// /users/{id}                           get, patch (self or admin)
///
/// /movies                               list, create (admin)
/// /movies/{id}                          get, patch, delete (admin writes)
///
/// /reviews                              list, create (admin)
/// /reviews/{id}                         get, patch, delete (admin writes)
/// /reviews/{id}/document                download, upload, delete (admin writes)
/// /reviews/{id}/document/view           inline view
/// /reviews/{id}/document/preview        text preview
/// /reviews/{id}/document/url            presigned or view URL
///
/// /articles                             list, create (admin)
/// /articles/{id}                        get, patch, delete (admin writes)
///
/// /tags                                 list, create-or-get (admin)
/// /tags/by-name/{name}                  lookup by normalized name
/// /tags/{id}                            get, delete (admin)
///
/// /search?q=                            unified search
/// /movie-ratings                        bulk rating lookup (POST)
/// /documents/extract                    extract text from an upload (POST)
///
/// /catalog/movies                       catalog search or popular
/// /catalog/discover                     catalog discover by genre
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/movies", movies::router())
        .nest("/reviews", reviews::router(max_upload_bytes))
        .nest("/articles", articles::router())
        .nest("/tags", tags::router())
        .nest("/search", search::router())
        .nest("/movie-ratings", ratings::router())
        .nest("/documents", documents::router(max_upload_bytes))
        .nest("/catalog", catalog::router())
}
