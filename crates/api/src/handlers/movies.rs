//! Handlers for `/movies`.
//!
//! Movies are always returned with their reviews, each carrying its tags.
//! Reviews and tags for a page of movies are loaded with one query each.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use reelnotes_core::error::{validate_input, CoreError};
use reelnotes_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use reelnotes_core::types::DbId;
use reelnotes_db::models::movie::{CreateMovie, Movie, MovieWithReviews, UpdateMovie};
use reelnotes_db::models::review::ReviewWithTags;
use reelnotes_db::repositories::{MovieRepo, ReviewRepo};
use reelnotes_db::DbPool;

use super::documents::discard_blob;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attach reviews (with tags) to each movie, preserving movie order.
async fn with_reviews(
    pool: &DbPool,
    movies: Vec<Movie>,
) -> Result<Vec<MovieWithReviews>, sqlx::Error> {
    let ids: Vec<DbId> = movies.iter().map(|m| m.id).collect();
    let reviews = ReviewRepo::list_for_movies(pool, &ids).await?;
    let reviews = ReviewRepo::attach_tags(pool, reviews).await?;

    let mut by_movie: HashMap<DbId, Vec<ReviewWithTags>> = HashMap::new();
    for review in reviews {
        if let Some(movie_id) = review.review.movie_id {
            by_movie.entry(movie_id).or_default().push(review);
        }
    }

    Ok(movies
        .into_iter()
        .map(|movie| MovieWithReviews {
            reviews: by_movie.remove(&movie.id).unwrap_or_default(),
            movie,
        })
        .collect())
}

async fn load_movie(state: &AppState, id: DbId) -> AppResult<MovieWithReviews> {
    let movie = MovieRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Movie", id }))?;
    let mut loaded = with_reviews(&state.pool, vec![movie]).await?;
    loaded
        .pop()
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Movie", id }))
}

/// GET /api/v1/movies
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let movies = MovieRepo::list(&state.pool, limit, offset).await?;
    let data = with_reviews(&state.pool, movies).await?;

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/movies
pub async fn create_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateMovie>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    let movie = MovieRepo::create(&state.pool, &input).await?;

    tracing::info!(movie_id = movie.id, user_id = admin.user_id, "Movie created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MovieWithReviews {
                movie,
                reviews: Vec::new(),
            },
        }),
    ))
}

/// GET /api/v1/movies/{id}
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let movie = load_movie(&state, id).await?;
    Ok(Json(DataResponse { data: movie }))
}

/// PATCH /api/v1/movies/{id}
pub async fn update_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMovie>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    MovieRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Movie", id }))?;

    tracing::info!(movie_id = id, user_id = admin.user_id, "Movie updated");

    let movie = load_movie(&state, id).await?;
    Ok(Json(DataResponse { data: movie }))
}

/// DELETE /api/v1/movies/{id}
///
/// Reviews go with the movie; their stored documents are removed best effort.
pub async fn delete_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let documents: Vec<String> = ReviewRepo::list_for_movies(&state.pool, &[id])
        .await?
        .into_iter()
        .filter_map(|r| r.document_path)
        .collect();

    if !MovieRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Movie", id }));
    }

    for path in &documents {
        discard_blob(state.store.as_ref(), path).await;
    }

    tracing::info!(
        movie_id = id,
        user_id = admin.user_id,
        documents_removed = documents.len(),
        "Movie deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
