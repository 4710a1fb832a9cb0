//! Tests for startup admin provisioning.

mod common;

use reelnotes_api::auth::password::verify_password;
use reelnotes_api::bootstrap::ensure_admin;
use reelnotes_api::config::BootstrapAdmin;
use reelnotes_db::repositories::UserRepo;
use sqlx::PgPool;

fn bootstrap(username: &str) -> BootstrapAdmin {
    BootstrapAdmin {
        username: username.to_string(),
        password: "bootstrap password".to_string(),
        email: format!("{username}@reelnotes.test"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creates_missing_admin(pool: PgPool) {
    ensure_admin(&pool, &bootstrap("root")).await.unwrap();

    let user = UserRepo::find_by_username(&pool, "root")
        .await
        .unwrap()
        .expect("admin should exist");
    assert!(user.is_admin);
    assert_eq!(user.email, "root@reelnotes.test");
    assert!(verify_password("bootstrap password", &user.password_hash).unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_run_is_a_no_op(pool: PgPool) {
    ensure_admin(&pool, &bootstrap("root")).await.unwrap();
    let first = UserRepo::find_by_username(&pool, "root").await.unwrap().unwrap();

    ensure_admin(&pool, &bootstrap("root")).await.unwrap();
    let second = UserRepo::find_by_username(&pool, "root").await.unwrap().unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.password_hash, second.password_hash);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn promotes_existing_user_without_touching_password(pool: PgPool) {
    let existing = common::create_user(&pool, "critic", false).await;
    assert!(!existing.is_admin);

    ensure_admin(&pool, &bootstrap("critic")).await.unwrap();

    let user = UserRepo::find_by_username(&pool, "critic").await.unwrap().unwrap();
    assert_eq!(user.id, existing.id);
    assert!(user.is_admin);
    assert!(verify_password(common::TEST_PASSWORD, &user.password_hash).unwrap());
}
