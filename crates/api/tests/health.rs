//! Integration tests for the health check, crawler files, and general HTTP
//! behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, body_text, get, post_json_auth, send};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["storage"], "local");
    assert_eq!(json["catalog_configured"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_request_id_is_propagated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_configured_origin(pool: PgPool) {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/movies")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

// ---------------------------------------------------------------------------
// Crawler files
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn robots_txt_points_at_sitemap(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/robots.txt").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let text = body_text(response).await;
    assert!(text.contains("Disallow: /api/"));
    assert!(text.contains("Sitemap: https://reelnotes.test/sitemap.xml"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sitemap_lists_static_pages_movies_and_articles(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let movie_id = common::create_movie(app.clone(), &token, "Heat", Some(949)).await;
    let article = post_json_auth(
        app.clone(),
        "/api/v1/articles",
        serde_json::json!({ "title": "On long takes", "review_text": "Essay body." }),
        &token,
    )
    .await;
    assert_eq!(article.status(), StatusCode::CREATED);
    let article_id = body_json(article).await["data"]["id"].as_i64().unwrap();

    let response = get(app, "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/xml"));

    let xml = body_text(response).await;
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<loc>https://reelnotes.test/</loc>"));
    assert!(xml.contains(&format!("<loc>https://reelnotes.test/movies/{movie_id}</loc>")));
    assert!(xml.contains(&format!("<loc>https://reelnotes.test/articles/{article_id}</loc>")));
}

// ---------------------------------------------------------------------------
// Catalog proxy without an API key
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn catalog_without_api_key_is_unavailable(pool: PgPool) {
    let app = common::build_test_app(pool);

    for uri in [
        "/api/v1/catalog/movies?search=heat",
        "/api/v1/catalog/discover?genre_id=80",
    ] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(body_json(response).await["code"], "SERVICE_UNAVAILABLE");
    }
}
