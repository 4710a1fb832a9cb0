//! Unified movie/article search.
//!
//! Each entity type is fetched with a single statement that both matches
//! and aggregates tag names, so a search costs exactly two queries.

use reelnotes_core::search::{build_contains_pattern, normalize_query, SEARCH_RESULT_LIMIT};
use sqlx::PgPool;

use crate::models::search::{ArticleSearchHit, MovieSearchHit, SearchResults};

pub struct SearchRepo;

impl SearchRepo {
    /// Search movies and articles. A blank query yields empty results.
    pub async fn search(pool: &PgPool, query: &str) -> Result<SearchResults, sqlx::Error> {
        let Some(pattern) = build_contains_pattern(query) else {
            return Ok(SearchResults::default());
        };

        let movies = Self::search_movies(pool, &pattern).await?;
        let articles = Self::search_articles(pool, &pattern).await?;

        tracing::debug!(
            movies = movies.len(),
            articles = articles.len(),
            "Search completed"
        );

        Ok(SearchResults {
            query: normalize_query(query).unwrap_or_default(),
            movies,
            articles,
        })
    }

    /// Movies whose own text, review text, or review tags match `pattern`.
    async fn search_movies(
        pool: &PgPool,
        pattern: &str,
    ) -> Result<Vec<MovieSearchHit>, sqlx::Error> {
        sqlx::query_as::<_, MovieSearchHit>(
            "WITH matched AS ( \
                SELECT DISTINCT m.id \
                FROM movies m \
                LEFT JOIN reviews r ON r.movie_id = m.id \
                LEFT JOIN review_tags rt ON rt.review_id = r.id \
                LEFT JOIN tags t ON t.id = rt.tag_id \
                WHERE m.title ILIKE $1 ESCAPE '\\' \
                   OR m.original_title ILIKE $1 ESCAPE '\\' \
                   OR m.overview ILIKE $1 ESCAPE '\\' \
                   OR r.title ILIKE $1 ESCAPE '\\' \
                   OR r.review_text ILIKE $1 ESCAPE '\\' \
                   OR r.description ILIKE $1 ESCAPE '\\' \
                   OR t.name ILIKE $1 ESCAPE '\\' \
             ) \
             SELECT m.id, m.title, m.original_title, m.overview, m.release_date, \
                    m.cover_photo, m.external_id, \
                    COALESCE( \
                        ARRAY_AGG(DISTINCT t.name::TEXT) FILTER (WHERE t.name IS NOT NULL), \
                        ARRAY[]::TEXT[] \
                    ) AS tags \
             FROM movies m \
             JOIN matched ON matched.id = m.id \
             LEFT JOIN reviews r ON r.movie_id = m.id \
             LEFT JOIN review_tags rt ON rt.review_id = r.id \
             LEFT JOIN tags t ON t.id = rt.tag_id \
             GROUP BY m.id \
             ORDER BY m.release_date DESC NULLS LAST, m.id DESC \
             LIMIT $2",
        )
        .bind(pattern)
        .bind(SEARCH_RESULT_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Articles whose text or tags match `pattern`.
    async fn search_articles(
        pool: &PgPool,
        pattern: &str,
    ) -> Result<Vec<ArticleSearchHit>, sqlx::Error> {
        sqlx::query_as::<_, ArticleSearchHit>(
            "WITH matched AS ( \
                SELECT DISTINCT r.id \
                FROM reviews r \
                LEFT JOIN review_tags rt ON rt.review_id = r.id \
                LEFT JOIN tags t ON t.id = rt.tag_id \
                WHERE r.movie_id IS NULL \
                  AND (r.title ILIKE $1 ESCAPE '\\' \
                       OR r.review_text ILIKE $1 ESCAPE '\\' \
                       OR r.description ILIKE $1 ESCAPE '\\' \
                       OR t.name ILIKE $1 ESCAPE '\\') \
             ) \
             SELECT r.id, r.title, r.description, r.review_text, r.date_added, r.has_document, \
                    COALESCE( \
                        ARRAY_AGG(DISTINCT t.name::TEXT) FILTER (WHERE t.name IS NOT NULL), \
                        ARRAY[]::TEXT[] \
                    ) AS tags \
             FROM reviews r \
             JOIN matched ON matched.id = r.id \
             LEFT JOIN review_tags rt ON rt.review_id = r.id \
             LEFT JOIN tags t ON t.id = rt.tag_id \
             GROUP BY r.id \
             ORDER BY r.date_added DESC, r.id DESC \
             LIMIT $2",
        )
        .bind(pattern)
        .bind(SEARCH_RESULT_LIMIT)
        .fetch_all(pool)
        .await
    }
}
