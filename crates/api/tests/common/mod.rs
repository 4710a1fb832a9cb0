#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::{Extension, Router};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use reelnotes_api::auth::jwt::{generate_access_token, JwtConfig};
use reelnotes_api::auth::password::hash_password;
use reelnotes_api::config::ServerConfig;
use reelnotes_api::router::build_app_router;
use reelnotes_api::state::AppState;
use reelnotes_db::models::user::{CreateUser, User};
use reelnotes_db::repositories::UserRepo;
use reelnotes_storage::local::LocalStore;
use reelnotes_storage::StorageConfig;

pub const TEST_PASSWORD: &str = "correct horse battery";
const BOUNDARY: &str = "reelnotes-test-boundary";

/// Fresh upload directory, removed when dropped.
pub fn test_storage() -> TempDir {
    tempfile::Builder::new()
        .prefix("reelnotes-test-")
        .tempdir()
        .expect("temp dir should be creatable")
}

pub fn test_jwt() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-for-integration-tests".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Documents are written below `upload_root` and the movie catalog is left
/// unconfigured.
pub fn test_config_in(upload_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        site_url: "https://reelnotes.test".to_string(),
        jwt: test_jwt(),
        storage: StorageConfig::Local {
            root: upload_root.to_path_buf(),
        },
        presign_expiry_secs: 3600,
        catalog_api_url: "http://127.0.0.1:9".to_string(),
        catalog_api_key: None,
        bootstrap_admin: None,
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    let storage = test_storage();
    let config = test_config_in(storage.path());
    // The directory lives as long as the last clone of the router.
    build_test_app_with(pool, config).layer(Extension(Arc::new(storage)))
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let root = match &config.storage {
        StorageConfig::Local { root } => root.clone(),
        StorageConfig::S3(_) => panic!("integration tests use the local store"),
    };

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store: Arc::new(LocalStore::new(root)),
        catalog: None,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user directly; its password is [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, is_admin: bool) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        first_name: None,
        last_name: None,
        phone_number: None,
        zipcode: None,
        is_admin,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, user.role(), &test_jwt())
        .expect("token generation should succeed")
}

/// Create an admin account and return its bearer token.
pub async fn admin_token(pool: &PgPool) -> String {
    let admin = create_user(pool, "admin", true).await;
    token_for(&admin)
}

/// Create a regular account and return its bearer token.
pub async fn user_token(pool: &PgPool, username: &str) -> String {
    let user = create_user(pool, username, false).await;
    token_for(&user)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a multipart form. `file` is sent in the `document` field.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(multipart_body(fields, file)))
        .unwrap();
    send(app, request).await
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

// ---------------------------------------------------------------------------
// Bodies and fixtures
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("body should be UTF-8")
}

/// Build a minimal `.docx` archive with one paragraph per entry.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Create a movie through the API and return its id.
pub async fn create_movie(app: Router, token: &str, title: &str, external_id: Option<i64>) -> i64 {
    let body = serde_json::json!({ "title": title, "external_id": external_id });
    let response = post_json_auth(app, "/api/v1/movies", body, token).await;
    assert_eq!(response.status(), 201, "movie creation should succeed");
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("movie id")
}

/// Create a review for `movie_id` through the API and return its id.
pub async fn create_review(
    app: Router,
    token: &str,
    movie_id: i64,
    rating: i64,
    tags: &[&str],
) -> i64 {
    let body = serde_json::json!({
        "movie_id": movie_id,
        "title": "A review",
        "rating": rating,
        "review_text": "Long take, quiet ending.",
        "tags": tags,
    });
    let response = post_json_auth(app, "/api/v1/reviews", body, token).await;
    assert_eq!(response.status(), 201, "review creation should succeed");
    body_json(response).await["data"]["id"]
        .as_i64()
        .expect("review id")
}
