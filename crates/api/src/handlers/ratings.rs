//! Handler for the bulk rating lookup.

use axum::extract::State;
use axum::Json;
use reelnotes_db::models::rating::{BulkRatingRequest, RatingMap};
use reelnotes_db::repositories::RatingRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/movie-ratings
///
/// Body `{ "local_ids": [..], "external_ids": [..] }`. Responds with a flat
/// map from each requested id that has a rating to
/// `{ "rating", "local_id" }`.
pub async fn bulk_ratings(
    State(state): State<AppState>,
    Json(request): Json<BulkRatingRequest>,
) -> AppResult<Json<RatingMap>> {
    if request.is_empty() {
        return Ok(Json(RatingMap::new()));
    }
    let ratings = RatingRepo::lookup(&state.pool, &request).await?;
    Ok(Json(ratings))
}
