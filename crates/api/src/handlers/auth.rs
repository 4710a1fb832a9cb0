//! Handlers for the `/auth` resource (signup, login, session, logout).

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reelnotes_core::error::{validate_input, CoreError};
use reelnotes_db::models::user::{CreateUser, User, UserResponse};
use reelnotes_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters."))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub zipcode: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create an account and log it in. Duplicate usernames or emails are
/// reported per field.
pub async fn signup(
    State(state): State<AppState>,
    Json(mut input): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    input.username = input.username.trim().to_string();
    input.email = input.email.trim().to_string();

    let mut fields = match validate_input(&input) {
        Ok(()) => BTreeMap::new(),
        Err(CoreError::InvalidFields(fields)) => fields,
        Err(other) => return Err(other.into()),
    };
    if let Err(msg) = validate_password_strength(&input.password, MIN_PASSWORD_LENGTH) {
        fields.insert("password".into(), msg);
    }
    if !fields.contains_key("username")
        && UserRepo::find_by_username(&state.pool, &input.username)
            .await?
            .is_some()
    {
        fields.insert("username".into(), "Username already exists.".into());
    }
    if !fields.contains_key("email")
        && UserRepo::find_by_email(&state.pool, &input.email)
            .await?
            .is_some()
    {
        fields.insert("email".into(), "Email already exists.".into());
    }
    if !fields.is_empty() {
        return Err(AppError::Core(CoreError::InvalidFields(fields)));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            phone_number: input.phone_number,
            zipcode: input.zipcode,
            is_admin: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User signed up");

    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(auth_response(&state, user)?))
}

/// GET /api/v1/auth/session
///
/// The current user, or 204 when the request carries no valid token.
pub async fn session(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let Some(auth) = auth else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    match UserRepo::find_by_id(&state.pool, auth.user_id).await? {
        Some(user) => Ok(Json(DataResponse {
            data: UserResponse::from(user),
        })
        .into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// DELETE /api/v1/auth/logout
///
/// Tokens are stateless; the client discards its token.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, user.role(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(user),
    })
}
