//! HTTP-level integration tests for the `/tags` endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, create_movie, create_review, delete_auth, get, post_json_auth,
    user_token,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_tag_is_create_or_get(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({ "name": "  Film Noir " });
    let first = post_json_auth(app.clone(), "/api/v1/tags", body, &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = body_json(first).await;
    assert_eq!(first["data"]["name"], "film noir");

    let second = post_json_auth(app, "/api/v1/tags", json!({ "name": "FILM NOIR" }), &token).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;
    assert_eq!(second["data"]["id"], first["data"]["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_tag_validation_and_rbac(pool: PgPool) {
    let admin = admin_token(&pool).await;
    let user = user_token(&pool, "tagger").await;
    let app = common::build_test_app(pool);

    let blank = post_json_auth(app.clone(), "/api/v1/tags", json!({ "name": "   " }), &admin).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let long = "x".repeat(51);
    let too_long =
        post_json_auth(app.clone(), "/api/v1/tags", json!({ "name": long }), &admin).await;
    assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);

    let forbidden = post_json_auth(app, "/api/v1/tags", json!({ "name": "noir" }), &user).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_tags_with_prefix(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);
    for name in ["noir", "neo-noir", "nouvelle vague", "western"] {
        post_json_auth(app.clone(), "/api/v1/tags", json!({ "name": name }), &token).await;
    }

    let response = get(app.clone(), "/api/v1/tags").await;
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["neo-noir", "noir", "nouvelle vague", "western"]);

    let response = get(app, "/api/v1/tags?prefix=NO").await;
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["noir", "nouvelle vague"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_tag_by_name_and_id(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let body = json!({ "name": "Slow Cinema" });
    let created = post_json_auth(app.clone(), "/api/v1/tags", body, &token).await;
    let id = body_json(created).await["data"]["id"].as_i64().unwrap();

    let response = get(app.clone(), "/api/v1/tags/by-name/SLOW%20CINEMA").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], id);

    let response = get(app.clone(), &format!("/api/v1/tags/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "slow cinema");

    let response = get(app, "/api/v1/tags/by-name/missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_tag_detaches_it_from_reviews(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);
    let movie_id = create_movie(app.clone(), &token, "Stalker", None).await;
    let review_id = create_review(app.clone(), &token, movie_id, 10, &["slow", "zone"]).await;

    let tag = get(app.clone(), "/api/v1/tags/by-name/slow").await;
    let tag_id = body_json(tag).await["data"]["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/tags/{tag_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &format!("/api/v1/reviews/{review_id}")).await;
    assert_eq!(body_json(response).await["data"]["tags"], json!(["zone"]));

    let response = delete_auth(app, &format!("/api/v1/tags/{tag_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
