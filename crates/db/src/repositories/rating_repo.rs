//! Bulk lookup of the latest rating per movie.

use reelnotes_core::types::DbId;
use sqlx::PgPool;

use crate::models::rating::{BulkRatingRequest, MovieRating, RatingEntry, RatingMap};

pub struct RatingRepo;

impl RatingRepo {
    /// Latest rated review per movie for the requested local and external
    /// ids, in one query.
    pub async fn latest_ratings(
        pool: &PgPool,
        local_ids: &[DbId],
        external_ids: &[i64],
    ) -> Result<Vec<MovieRating>, sqlx::Error> {
        if local_ids.is_empty() && external_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, MovieRating>(
            "SELECT DISTINCT ON (m.id) m.id AS movie_id, m.external_id, r.rating \
             FROM movies m \
             JOIN reviews r ON r.movie_id = m.id AND r.rating IS NOT NULL \
             WHERE m.id = ANY($1) OR m.external_id = ANY($2) \
             ORDER BY m.id, r.date_added DESC, r.id DESC",
        )
        .bind(local_ids)
        .bind(external_ids)
        .fetch_all(pool)
        .await
    }

    /// Resolve a bulk request into the response map.
    pub async fn lookup(pool: &PgPool, request: &BulkRatingRequest) -> Result<RatingMap, sqlx::Error> {
        let rows = Self::latest_ratings(pool, &request.local_ids, &request.external_ids).await?;
        Ok(build_rating_map(request, &rows))
    }
}

/// Key each requested id that has a rating. Local ids are filled first and
/// external ids never overwrite an existing key.
pub fn build_rating_map(request: &BulkRatingRequest, rows: &[MovieRating]) -> RatingMap {
    let mut map = RatingMap::new();
    for row in rows {
        if request.local_ids.contains(&row.movie_id) {
            let entry = RatingEntry {
                rating: row.rating,
                local_id: row.movie_id,
            };
            map.insert(row.movie_id.to_string(), entry);
        }
    }
    for row in rows {
        let Some(external_id) = row.external_id else {
            continue;
        };
        if request.external_ids.contains(&external_id) {
            map.entry(external_id.to_string()).or_insert(RatingEntry {
                rating: row.rating,
                local_id: row.movie_id,
            });
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(movie_id: DbId, external_id: Option<i64>, rating: i16) -> MovieRating {
        MovieRating {
            movie_id,
            external_id,
            rating,
        }
    }

    #[test]
    fn empty_request_builds_empty_map() {
        let map = build_rating_map(&BulkRatingRequest::default(), &[row(1, Some(10), 7)]);
        assert!(map.is_empty());
    }

    #[test]
    fn keys_by_requested_id_kind() {
        let request = BulkRatingRequest {
            local_ids: vec![1],
            external_ids: vec![20],
        };
        let rows = [row(1, Some(10), 7), row(2, Some(20), 9)];
        let map = build_rating_map(&request, &rows);

        assert_eq!(map.len(), 2);
        assert_eq!(map["1"], RatingEntry { rating: 7, local_id: 1 });
        assert_eq!(map["20"], RatingEntry { rating: 9, local_id: 2 });
        assert!(!map.contains_key("10"));
    }

    #[test]
    fn local_key_wins_on_collision() {
        let request = BulkRatingRequest {
            local_ids: vec![5],
            external_ids: vec![5],
        };
        let rows = [row(5, Some(99), 3), row(8, Some(5), 6)];
        let map = build_rating_map(&request, &rows);
        assert_eq!(map["5"], RatingEntry { rating: 3, local_id: 5 });
    }
}
