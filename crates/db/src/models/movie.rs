//! Movie entity model and DTOs.

use reelnotes_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::review::ReviewWithTags;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<Date>,
    pub cover_photo: Option<String>,
    pub external_id: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A movie together with its reviews (each carrying its tags).
#[derive(Debug, Clone, Serialize)]
pub struct MovieWithReviews {
    #[serde(flatten)]
    pub movie: Movie,
    pub reviews: Vec<ReviewWithTags>,
}

/// DTO for creating a movie.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMovie {
    #[validate(length(min = 1, max = 500, message = "Title cannot be empty."))]
    pub title: String,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<Date>,
    #[validate(url(message = "Cover photo must be a URL."))]
    pub cover_photo: Option<String>,
    pub external_id: Option<i64>,
}

/// DTO for updating a movie. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMovie {
    #[validate(length(min = 1, max = 500, message = "Title cannot be empty."))]
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<Date>,
    #[validate(url(message = "Cover photo must be a URL."))]
    pub cover_photo: Option<String>,
    pub external_id: Option<i64>,
}

/// Sitemap row: id plus last modification date.
#[derive(Debug, Clone, FromRow)]
pub struct SitemapRow {
    pub id: DbId,
    pub last_modified: Date,
}
