use rand::Rng;
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Pool for the database named by `TEST_DATABASE_URL`, migrated. `None` when
/// the variable is unset so the caller can skip.
pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to TEST_DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

/// Description text no other test run will produce.
pub fn unique_description(label: &str) -> String {
    let nonce: u64 = rand::thread_rng().r#gen();
    format!("{label} java role {nonce:x}")
}
