//! Repository for the `tags` and `review_tags` tables.
//!
//! Provides tag CRUD, prefix suggestions, and the review/tag associations.

use std::collections::HashMap;

use reelnotes_core::search::{
    build_prefix_pattern, clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use reelnotes_core::tag::normalize_tag_name;
use reelnotes_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{ReviewTagName, Tag, TagListParams};

/// Column list for `tags` queries.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for tags and review-tag associations.
pub struct TagRepo;

impl TagRepo {
    // -----------------------------------------------------------------------
    // Tag CRUD
    // -----------------------------------------------------------------------

    /// Create a tag or return the existing one with the same normalized name.
    pub async fn create_or_get(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(normalize_tag_name(name))
            .fetch_one(pool)
            .await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tag by name, normalizing the lookup key first.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE name = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(normalize_tag_name(name))
            .fetch_optional(pool)
            .await
    }

    /// List tags alphabetically, optionally restricted to a name prefix.
    pub async fn list(pool: &PgPool, params: &TagListParams) -> Result<Vec<Tag>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(params.offset);
        let pattern = params
            .prefix
            .as_deref()
            .and_then(|p| build_prefix_pattern(&normalize_tag_name(p)));

        match pattern {
            Some(pattern) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM tags \
                     WHERE name LIKE $1 ESCAPE '\\' \
                     ORDER BY name \
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Tag>(&query)
                    .bind(pattern)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM tags \
                     ORDER BY name \
                     LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Tag>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Delete a tag; its review associations go with it. Returns `true` if
    /// a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Review associations
    // -----------------------------------------------------------------------

    /// Tag names for many reviews in one query, keyed by review id.
    ///
    /// Reviews without tags are absent from the map.
    pub async fn names_for_reviews(
        pool: &PgPool,
        review_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<String>>, sqlx::Error> {
        if review_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, ReviewTagName>(
            "SELECT rt.review_id, t.name \
             FROM review_tags rt \
             JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.review_id = ANY($1) \
             ORDER BY rt.review_id, t.name",
        )
        .bind(review_ids)
        .fetch_all(pool)
        .await?;

        let mut map: HashMap<DbId, Vec<String>> = HashMap::new();
        for row in rows {
            map.entry(row.review_id).or_default().push(row.name);
        }
        Ok(map)
    }

    /// Replace the tag set of a review inside an existing transaction.
    ///
    /// `names` must already be normalized and de-duplicated.
    pub(crate) async fn replace_for_review(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        review_id: DbId,
        names: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM review_tags WHERE review_id = $1")
            .bind(review_id)
            .execute(&mut **tx)
            .await?;

        for name in names {
            let (tag_id,): (DbId,) = sqlx::query_as(
                "INSERT INTO tags (name) VALUES ($1) \
                 ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
                 RETURNING id",
            )
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;

            sqlx::query(
                "INSERT INTO review_tags (review_id, tag_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(review_id)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
