//! Movie catalog proxy handlers.
//!
//! Responses are the catalog's JSON, passed through unchanged.

use axum::extract::{Query, State};
use axum::Json;
use reelnotes_catalog::CatalogClient;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::query::SearchPageParams;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DiscoverParams {
    pub genre_id: Option<i64>,
    pub search: Option<String>,
    pub page: Option<u32>,
}

fn client(state: &AppState) -> AppResult<&CatalogClient> {
    state.catalog.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Movie catalog API key is not configured".into())
    })
}

/// GET /api/v1/catalog/movies?search=&page=
///
/// Search when `search` is non-empty, popular movies otherwise.
pub async fn catalog_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchPageParams>,
) -> AppResult<Json<Value>> {
    let client = client(&state)?;
    let page = params.page.unwrap_or(1).max(1);

    let results = match params.search.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => client.search_movies(query, page).await?,
        _ => client.popular(page).await?,
    };
    Ok(Json(results))
}

/// GET /api/v1/catalog/discover?genre_id=&search=&page=
pub async fn catalog_discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> AppResult<Json<Value>> {
    let client = client(&state)?;
    let page = params.page.unwrap_or(1).max(1);

    let results = client
        .discover(params.genre_id, params.search.as_deref(), page)
        .await?;
    Ok(Json(results))
}
