//! Repository for the `reviews` table (reviews and articles).

use reelnotes_core::review::ContentType;
use reelnotes_core::search::{
    build_contains_pattern, clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use reelnotes_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::SitemapRow;
use crate::models::review::{
    DocumentMetadata, NewReview, Review, ReviewChanges, ReviewListParams, ReviewWithTags,
};
use crate::repositories::tag_repo::TagRepo;

/// Column list shared across queries.
const COLUMNS: &str = "id, movie_id, title, description, rating, review_text, content_type, \
    date_added, has_document, document_filename, document_path, document_type, \
    created_at, updated_at";

/// Provides CRUD operations for reviews and articles.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review or article together with its tag set in one
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        input: &NewReview,
        tags: &[String],
    ) -> Result<Review, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO reviews
                (movie_id, title, description, rating, review_text, content_type)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(input.movie_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.rating)
            .bind(&input.review_text)
            .bind(&input.content_type)
            .fetch_one(&mut *tx)
            .await?;

        if !tags.is_empty() {
            TagRepo::replace_for_review(&mut tx, review.id, tags).await?;
        }

        tx.commit().await?;
        Ok(review)
    }

    /// Find a review or article by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a row by ID only if it has the given content type.
    pub async fn find_by_id_and_type(
        pool: &PgPool,
        id: DbId,
        content_type: ContentType,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1 AND content_type = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(content_type.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Find a row by ID with its tags attached.
    pub async fn find_with_tags(
        pool: &PgPool,
        id: DbId,
        content_type: ContentType,
    ) -> Result<Option<ReviewWithTags>, sqlx::Error> {
        match Self::find_by_id_and_type(pool, id, content_type).await? {
            Some(review) => Ok(Self::attach_tags(pool, vec![review]).await?.pop()),
            None => Ok(None),
        }
    }

    /// List rows of one content type, newest first.
    ///
    /// `search` matches title, description and body case-insensitively.
    pub async fn list(
        pool: &PgPool,
        content_type: ContentType,
        params: &ReviewListParams,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(params.offset);
        let pattern = params.search.as_deref().and_then(build_contains_pattern);

        let query = format!(
            "SELECT {COLUMNS} FROM reviews
             WHERE content_type = $1
               AND ($2::BIGINT IS NULL OR movie_id = $2)
               AND ($3::TEXT IS NULL
                    OR title ILIKE $3 ESCAPE '\\'
                    OR description ILIKE $3 ESCAPE '\\'
                    OR review_text ILIKE $3 ESCAPE '\\')
             ORDER BY date_added DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(content_type.as_str())
            .bind(params.movie_id)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All reviews for the given movies, newest first.
    pub async fn list_for_movies(
        pool: &PgPool,
        movie_ids: &[DbId],
    ) -> Result<Vec<Review>, sqlx::Error> {
        if movie_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM reviews
             WHERE movie_id = ANY($1)
             ORDER BY date_added DESC, id DESC"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(movie_ids)
            .fetch_all(pool)
            .await
    }

    /// Load tags for a batch of reviews with a single query.
    pub async fn attach_tags(
        pool: &PgPool,
        reviews: Vec<Review>,
    ) -> Result<Vec<ReviewWithTags>, sqlx::Error> {
        let ids: Vec<DbId> = reviews.iter().map(|r| r.id).collect();
        let mut tags = TagRepo::names_for_reviews(pool, &ids).await?;
        Ok(reviews
            .into_iter()
            .map(|review| {
                let names = tags.remove(&review.id).unwrap_or_default();
                ReviewWithTags::new(review, names)
            })
            .collect())
    }

    /// Update columns and, when `tags` is `Some`, replace the tag set, all in
    /// one transaction. Returns `None` if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &ReviewChanges,
        tags: Option<&[String]>,
    ) -> Result<Option<Review>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE reviews SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                rating = COALESCE($5, rating),
                review_text = COALESCE($6, review_text)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(changes.description.is_some())
            .bind(changes.description.as_ref().and_then(|d| d.as_deref()))
            .bind(changes.rating)
            .bind(&changes.review_text)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(review) = review else {
            return Ok(None);
        };

        if let Some(tags) = tags {
            TagRepo::replace_for_review(&mut tx, review.id, tags).await?;
        }

        tx.commit().await?;
        Ok(Some(review))
    }

    /// Delete a row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Attached documents
    // -----------------------------------------------------------------------

    /// Record an attached document, optionally replacing the body text.
    pub async fn set_document(
        pool: &PgPool,
        id: DbId,
        document: &DocumentMetadata,
        replace_text: Option<&str>,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET
                has_document = true,
                document_filename = $2,
                document_path = $3,
                document_type = $4,
                review_text = COALESCE($5, review_text)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(&document.filename)
            .bind(&document.path)
            .bind(&document.file_type)
            .bind(replace_text)
            .fetch_optional(pool)
            .await
    }

    /// Clear document metadata. Returns `None` if the row does not exist.
    pub async fn clear_document(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET
                has_document = false,
                document_filename = NULL,
                document_path = NULL,
                document_type = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Article ids and last-modified dates for the sitemap.
    pub async fn list_articles_for_sitemap(pool: &PgPool) -> Result<Vec<SitemapRow>, sqlx::Error> {
        sqlx::query_as::<_, SitemapRow>(
            "SELECT id, (updated_at AT TIME ZONE 'UTC')::date AS last_modified
             FROM reviews WHERE content_type = 'article' ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }
}
