//! Root-level crawler files: `/sitemap.xml` and `/robots.txt`.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use reelnotes_core::seo::{render_robots, render_sitemap, static_entries, SitemapEntry};
use reelnotes_db::repositories::{MovieRepo, ReviewRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// GET /sitemap.xml
async fn sitemap(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let movies = MovieRepo::list_for_sitemap(&state.pool).await?;
    let articles = ReviewRepo::list_articles_for_sitemap(&state.pool).await?;

    let mut entries = static_entries(chrono::Utc::now().date_naive());
    entries.extend(
        movies
            .into_iter()
            .map(|row| SitemapEntry::movie(row.id, Some(row.last_modified))),
    );
    entries.extend(
        articles
            .into_iter()
            .map(|row| SitemapEntry::article(row.id, Some(row.last_modified))),
    );

    tracing::debug!(entries = entries.len(), "Rendered sitemap");

    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap(&state.config.site_url, &entries),
    ))
}

/// GET /robots.txt
async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.config.site_url),
    )
}

/// Mount crawler routes (root level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
}
