//! Handlers for `/users`.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use reelnotes_core::error::CoreError;
use reelnotes_core::types::DbId;
use reelnotes_db::models::user::{UpdateUser, UserResponse};
use reelnotes_db::repositories::UserRepo;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PATCH /api/v1/users/{id}
///
/// Users may edit their own profile; admins may edit anyone's.
pub async fn update_user(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    if auth.user_id != id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only edit your own profile".into(),
        )));
    }

    if let Some(email) = input.email.as_mut() {
        *email = email.trim().to_string();
        let mut fields = BTreeMap::new();
        if !email.validate_email() {
            fields.insert("email".to_string(), "Enter a valid email address.".to_string());
        } else if let Some(other) = UserRepo::find_by_email(&state.pool, email).await? {
            if other.id != id {
                fields.insert("email".to_string(), "Email already exists.".to_string());
            }
        }
        if !fields.is_empty() {
            return Err(AppError::Core(CoreError::InvalidFields(fields)));
        }
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, editor_id = auth.user_id, "User profile updated");

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}
