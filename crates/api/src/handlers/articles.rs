//! Handlers for `/articles`: reviews without a movie or rating.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use reelnotes_core::review::{require_text, validate_title, ContentType};
use reelnotes_core::tag::normalize_tag_list;
use reelnotes_core::types::DbId;
use reelnotes_db::models::review::{CreateArticle, NewReview, ReviewListParams, UpdateReview};

use super::reviews::{
    body_label, clean_description, delete_of_type, get_of_type, insert_with_tags, list_of_type,
    update_of_type,
};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/articles
///
/// Optional `?search=&limit=&offset=`.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(mut params): Query<ReviewListParams>,
) -> AppResult<impl IntoResponse> {
    params.movie_id = None;
    let articles = list_of_type(&state, ContentType::Article, &params).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// POST /api/v1/articles
pub async fn create_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateArticle>,
) -> AppResult<impl IntoResponse> {
    let new_article = NewReview {
        movie_id: None,
        title: validate_title(&input.title)?,
        description: clean_description(input.description),
        rating: None,
        review_text: require_text(body_label(ContentType::Article), &input.review_text)?,
        content_type: ContentType::Article.as_str().to_string(),
    };
    let tags = normalize_tag_list(&input.tags)?;

    let article = insert_with_tags(&state, &new_article, &tags).await?;

    tracing::info!(
        article_id = article.review.id,
        user_id = admin.user_id,
        "Article created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: article })))
}

/// GET /api/v1/articles/{id}
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = get_of_type(&state, id, ContentType::Article).await?;
    Ok(Json(DataResponse { data: article }))
}

/// PATCH /api/v1/articles/{id}
pub async fn update_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReview>,
) -> AppResult<impl IntoResponse> {
    let article = update_of_type(&state, &admin, id, ContentType::Article, input).await?;
    Ok(Json(DataResponse { data: article }))
}

/// DELETE /api/v1/articles/{id}
pub async fn delete_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    delete_of_type(&state, &admin, id, ContentType::Article).await
}
