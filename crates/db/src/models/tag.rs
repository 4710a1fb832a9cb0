//! Tag models and DTOs.

use reelnotes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tags` table. `name` is always normalized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Tag name attached to a review, used when eager-loading tags for many
/// reviews at once.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewTagName {
    pub review_id: DbId,
    pub name: String,
}

/// DTO for the create-or-get operation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
}

/// Query parameters for listing tags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagListParams {
    /// Only tags whose normalized name starts with this prefix.
    pub prefix: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
