//! Review/article models and DTOs.
//!
//! Reviews and articles share the `reviews` table; `content_type` and the
//! presence of `movie_id` tell them apart.

use reelnotes_core::review::short_content;
use reelnotes_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::movie::CreateMovie;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub movie_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<i16>,
    pub review_text: String,
    pub content_type: String,
    pub date_added: Date,
    pub has_document: bool,
    pub document_filename: Option<String>,
    /// Storage key; not exposed to clients.
    #[serde(skip_serializing)]
    pub document_path: Option<String>,
    pub document_type: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review with its tag names and a short teaser of the body.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithTags {
    #[serde(flatten)]
    pub review: Review,
    pub short_content: String,
    pub tags: Vec<String>,
}

impl ReviewWithTags {
    pub fn new(review: Review, tags: Vec<String>) -> Self {
        Self {
            short_content: short_content(&review.review_text),
            review,
            tags,
        }
    }
}

/// Request body for creating a review.
///
/// The movie is either referenced by `movie_id` or embedded in `movie`, in
/// which case it is upserted by `external_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub movie_id: Option<DbId>,
    pub movie: Option<CreateMovie>,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<i16>,
    pub review_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for creating an article.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticle {
    pub title: String,
    pub description: Option<String>,
    pub review_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for patching a review or article. `tags`, when present,
/// replaces the whole tag set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReview {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i16>,
    pub review_text: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Validated insert payload.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub movie_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub rating: Option<i16>,
    pub review_text: String,
    pub content_type: String,
}

/// Validated column changes for an update.
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub title: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub rating: Option<i16>,
    pub review_text: Option<String>,
}

/// Metadata recorded when a document is attached to a review.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    pub filename: String,
    pub path: String,
    pub file_type: String,
}

/// Query parameters for listing reviews or articles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewListParams {
    pub movie_id: Option<DbId>,
    /// Substring match on title, description and body.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
