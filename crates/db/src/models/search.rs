//! Unified search result models.

use reelnotes_core::types::{Date, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A movie matched by search, with all of its tag names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieSearchHit {
    pub id: DbId,
    pub title: String,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<Date>,
    pub cover_photo: Option<String>,
    pub external_id: Option<i64>,
    pub tags: Vec<String>,
}

/// An article matched by search, with its tag names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleSearchHit {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub review_text: String,
    pub date_added: Date,
    pub has_document: bool,
    pub tags: Vec<String>,
}

/// Combined search response.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub movies: Vec<MovieSearchHit>,
    pub articles: Vec<ArticleSearchHit>,
}
