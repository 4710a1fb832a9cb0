//! Startup admin provisioning.

use reelnotes_db::models::user::CreateUser;
use reelnotes_db::repositories::UserRepo;
use reelnotes_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Make sure the configured admin account exists and has admin rights.
///
/// An existing account with that username is promoted; its password is left
/// untouched.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<()> {
    if let Some(user) = UserRepo::find_by_username(pool, &admin.username).await? {
        if UserRepo::promote_to_admin(pool, user.id).await? {
            tracing::info!(user_id = user.id, username = %user.username, "Promoted bootstrap admin");
        }
        return Ok(());
    }

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash,
            first_name: None,
            last_name: None,
            phone_number: None,
            zipcode: None,
            is_admin: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Created bootstrap admin");
    Ok(())
}
