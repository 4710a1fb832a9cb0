use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    reelnotes_db::health_check(&pool).await.unwrap();

    for table in ["users", "movies", "reviews", "tags", "review_tags"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Trigram indexes need the pg_trgm extension.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pg_trgm_available(pool: PgPool) {
    let (similarity,): (f32,) = sqlx::query_as("SELECT similarity('noir', 'noir')")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!((similarity - 1.0).abs() < f32::EPSILON);
}

/// The updated_at trigger fires on update.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger(pool: PgPool) {
    let (id, created): (i64, chrono::DateTime<chrono::Utc>) =
        sqlx::query_as("INSERT INTO tags (name) VALUES ('x') RETURNING id, updated_at")
            .fetch_one(&pool)
            .await
            .unwrap();

    // Transactions share NOW(); the update runs in its own.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (updated,): (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("UPDATE tags SET name = 'y' WHERE id = $1 RETURNING updated_at")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(updated > created);
}
