//! Handlers for `/reviews`.
//!
//! Articles live in the same table; the helpers here are shared with
//! [`super::articles`] and take the [`ContentType`] to operate on.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use reelnotes_core::error::{validate_input, CoreError};
use reelnotes_core::review::{
    require_text, validate_rating, validate_rating_for, validate_title, ContentType,
};
use reelnotes_core::tag::normalize_tag_list;
use reelnotes_core::types::DbId;
use reelnotes_db::models::review::{
    CreateReview, NewReview, ReviewChanges, ReviewListParams, ReviewWithTags, UpdateReview,
};
use reelnotes_db::repositories::{MovieRepo, ReviewRepo};

use super::documents::discard_blob;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn entity_name(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Review => "Review",
        ContentType::Article => "Article",
    }
}

/// Trim an optional description, treating blank as absent.
pub(crate) fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Validate a patch body into column changes plus an optional tag set.
pub(crate) fn validate_changes(
    content_type: ContentType,
    input: UpdateReview,
) -> AppResult<(ReviewChanges, Option<Vec<String>>)> {
    if let Some(rating) = input.rating {
        match content_type {
            ContentType::Review => validate_rating(rating)?,
            ContentType::Article => validate_rating_for(ContentType::Article, Some(rating))?,
        }
    }

    let changes = ReviewChanges {
        title: input.title.as_deref().map(validate_title).transpose()?,
        description: input
            .description
            .map(|d| clean_description(Some(d))),
        rating: input.rating,
        review_text: input
            .review_text
            .as_deref()
            .map(|t| require_text(body_label(content_type), t))
            .transpose()?,
    };
    let tags = input
        .tags
        .as_deref()
        .map(normalize_tag_list)
        .transpose()?;

    Ok((changes, tags))
}

pub(crate) fn body_label(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Review => "Review text",
        ContentType::Article => "Article text",
    }
}

pub(crate) async fn list_of_type(
    state: &AppState,
    content_type: ContentType,
    params: &ReviewListParams,
) -> AppResult<Vec<ReviewWithTags>> {
    let rows = ReviewRepo::list(&state.pool, content_type, params).await?;
    Ok(ReviewRepo::attach_tags(&state.pool, rows).await?)
}

pub(crate) async fn get_of_type(
    state: &AppState,
    id: DbId,
    content_type: ContentType,
) -> AppResult<ReviewWithTags> {
    ReviewRepo::find_with_tags(&state.pool, id, content_type)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: entity_name(content_type),
            id,
        }))
}

pub(crate) async fn update_of_type(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    content_type: ContentType,
    input: UpdateReview,
) -> AppResult<ReviewWithTags> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: entity_name(content_type),
            id,
        })
    };

    ReviewRepo::find_by_id_and_type(&state.pool, id, content_type)
        .await?
        .ok_or_else(not_found)?;

    let (changes, tags) = validate_changes(content_type, input)?;
    let review = ReviewRepo::update(&state.pool, id, &changes, tags.as_deref())
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(
        review_id = id,
        content_type = %content_type,
        user_id = auth.user_id,
        "Review updated",
    );

    let mut rows = ReviewRepo::attach_tags(&state.pool, vec![review]).await?;
    rows.pop().ok_or_else(not_found)
}

pub(crate) async fn delete_of_type(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
    content_type: ContentType,
) -> AppResult<StatusCode> {
    let review = ReviewRepo::find_by_id_and_type(&state.pool, id, content_type)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: entity_name(content_type),
            id,
        }))?;

    ReviewRepo::delete(&state.pool, id).await?;
    if let Some(path) = review.document_path.as_deref() {
        discard_blob(state.store.as_ref(), path).await;
    }

    tracing::info!(
        review_id = id,
        content_type = %content_type,
        user_id = auth.user_id,
        "Review deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Insert a validated row and return it with its tags.
pub(crate) async fn insert_with_tags(
    state: &AppState,
    input: &NewReview,
    tags: &[String],
) -> AppResult<ReviewWithTags> {
    let review = ReviewRepo::create(&state.pool, input, tags).await?;
    let id = review.id;
    let mut rows = ReviewRepo::attach_tags(&state.pool, vec![review]).await?;
    rows.pop()
        .ok_or(AppError::InternalError(format!("review {id} vanished after insert")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/reviews
///
/// Optional `?movie_id=&search=&limit=&offset=`.
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewListParams>,
) -> AppResult<impl IntoResponse> {
    let reviews = list_of_type(&state, ContentType::Review, &params).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// POST /api/v1/reviews
///
/// The movie is given either as `movie_id` or as an embedded `movie`, which
/// is upserted by its external catalog id.
pub async fn create_review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateReview>,
) -> AppResult<impl IntoResponse> {
    let title = validate_title(&input.title)?;
    let review_text = require_text(body_label(ContentType::Review), &input.review_text)?;
    validate_rating_for(ContentType::Review, input.rating)?;
    let tags = normalize_tag_list(&input.tags)?;

    let movie_id = match (input.movie_id, &input.movie) {
        (Some(movie_id), _) => {
            MovieRepo::find_by_id(&state.pool, movie_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Movie",
                    id: movie_id,
                }))?
                .id
        }
        (None, Some(movie)) => {
            validate_input(movie)?;
            MovieRepo::upsert_by_external_id(&state.pool, movie).await?.id
        }
        (None, None) => {
            return Err(AppError::Core(CoreError::Validation(
                "A review needs either movie_id or movie".into(),
            )))
        }
    };

    let new_review = NewReview {
        movie_id: Some(movie_id),
        title,
        description: clean_description(input.description),
        rating: input.rating,
        review_text,
        content_type: ContentType::Review.as_str().to_string(),
    };
    let review = insert_with_tags(&state, &new_review, &tags).await?;

    tracing::info!(
        review_id = review.review.id,
        movie_id,
        user_id = admin.user_id,
        "Review created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let review = get_of_type(&state, id, ContentType::Review).await?;
    Ok(Json(DataResponse { data: review }))
}

/// PATCH /api/v1/reviews/{id}
///
/// `tags`, when present, replaces the whole tag set.
pub async fn update_review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReview>,
) -> AppResult<impl IntoResponse> {
    let review = update_of_type(&state, &admin, id, ContentType::Review, input).await?;
    Ok(Json(DataResponse { data: review }))
}

/// DELETE /api/v1/reviews/{id}
///
/// Also removes the attached document from storage, best effort.
pub async fn delete_review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_of_type(&state, &admin, id, ContentType::Review).await
}
