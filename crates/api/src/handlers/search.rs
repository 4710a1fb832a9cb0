//! Handler for unified search.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use reelnotes_db::repositories::SearchRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/search?q=
///
/// Matching movies and articles, each capped at 25. A missing or blank
/// query returns empty lists.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let results = SearchRepo::search(&state.pool, &params.q).await?;
    Ok(Json(DataResponse { data: results }))
}
