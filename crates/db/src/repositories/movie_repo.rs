//! Repository for the `movies` table.

use reelnotes_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::{CreateMovie, Movie, SitemapRow, UpdateMovie};

/// Column list shared across queries.
const COLUMNS: &str = "id, title, original_title, original_language, overview, \
    release_date, cover_photo, external_id, created_at, updated_at";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies
                (title, original_title, original_language, overview,
                 release_date, cover_photo, external_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.original_title)
            .bind(&input.original_language)
            .bind(&input.overview)
            .bind(input.release_date)
            .bind(&input.cover_photo)
            .bind(input.external_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a movie, or refresh the existing row with the same
    /// `external_id`. Movies without an external id are always inserted.
    pub async fn upsert_by_external_id(
        pool: &PgPool,
        input: &CreateMovie,
    ) -> Result<Movie, sqlx::Error> {
        if input.external_id.is_none() {
            return Self::create(pool, input).await;
        }
        let query = format!(
            "INSERT INTO movies
                (title, original_title, original_language, overview,
                 release_date, cover_photo, external_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (external_id) DO UPDATE SET
                title = EXCLUDED.title,
                original_title = COALESCE(EXCLUDED.original_title, movies.original_title),
                original_language = COALESCE(EXCLUDED.original_language, movies.original_language),
                overview = COALESCE(EXCLUDED.overview, movies.overview),
                release_date = COALESCE(EXCLUDED.release_date, movies.release_date),
                cover_photo = COALESCE(EXCLUDED.cover_photo, movies.cover_photo)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.original_title)
            .bind(&input.original_language)
            .bind(&input.overview)
            .bind(input.release_date)
            .bind(&input.cover_photo)
            .bind(input.external_id)
            .fetch_one(pool)
            .await
    }

    /// Find a movie by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a movie by its catalog id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: i64,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE external_id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// List movies, newest release first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             ORDER BY release_date DESC NULLS LAST, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a movie. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMovie,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = COALESCE($2, title),
                original_title = COALESCE($3, original_title),
                original_language = COALESCE($4, original_language),
                overview = COALESCE($5, overview),
                release_date = COALESCE($6, release_date),
                cover_photo = COALESCE($7, cover_photo),
                external_id = COALESCE($8, external_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.original_title)
            .bind(&input.original_language)
            .bind(&input.overview)
            .bind(input.release_date)
            .bind(&input.cover_photo)
            .bind(input.external_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a movie and, by cascade, its reviews. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ids and last-modified dates for the sitemap.
    pub async fn list_for_sitemap(pool: &PgPool) -> Result<Vec<SitemapRow>, sqlx::Error> {
        sqlx::query_as::<_, SitemapRow>(
            "SELECT id, (updated_at AT TIME ZONE 'UTC')::date AS last_modified
             FROM movies ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }
}
