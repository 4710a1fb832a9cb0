//! Bulk rating lookup models.

use std::collections::BTreeMap;

use reelnotes_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Request body for the bulk rating lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkRatingRequest {
    #[serde(default)]
    pub local_ids: Vec<DbId>,
    #[serde(default)]
    pub external_ids: Vec<i64>,
}

impl BulkRatingRequest {
    pub fn is_empty(&self) -> bool {
        self.local_ids.is_empty() && self.external_ids.is_empty()
    }
}

/// Latest rating for one movie.
#[derive(Debug, Clone, FromRow)]
pub struct MovieRating {
    pub movie_id: DbId,
    pub external_id: Option<i64>,
    pub rating: i16,
}

/// One entry of the response map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingEntry {
    pub rating: i16,
    pub local_id: DbId,
}

/// Response map keyed by the requested id rendered as a string.
pub type RatingMap = BTreeMap<String, RatingEntry>;
