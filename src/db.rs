use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use tracing::info;

/// Build connection options, preferring the full URL when one is configured.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    if let Some(url) = &config.url {
        return PgConnectOptions::from_str(url).context("invalid DATABASE_URL");
    }

    let ssl_mode = PgSslMode::from_str(&config.ssl_mode)
        .with_context(|| format!("invalid DB_SSLMODE '{}'", config.ssl_mode))?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.name)
        .username(&config.user)
        .password(&config.password)
        .ssl_mode(ssl_mode))
}

/// Open a small pool and bring the schema up to date.
///
/// Runs are sequential, so a couple of connections is plenty. Each statement
/// auto-commits; nothing spans several postings in one transaction.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    info!(host = %config.host, database = %config.name, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(connect_options(config)?)
        .await
        .context("failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}
