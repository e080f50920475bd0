use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::{info, warn};

const MAX_CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Creates a PostgreSQL connection pool, retrying while the database comes up.
pub async fn create_pool(connect_options: &PgConnectOptions) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let options = PgPoolOptions::new()
        .max_connections(25)
        .min_connections(0)
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(5 * 60));

    let mut attempt = 1;
    let pool = loop {
        match options.clone().connect_with(connect_options.clone()).await {
            Ok(pool) => break pool,
            Err(e) if attempt < MAX_CONNECT_ATTEMPTS => {
                warn!(
                    "Failed to connect to database (attempt {}/{}): {}",
                    attempt, MAX_CONNECT_ATTEMPTS, e
                );
                attempt += 1;
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to connect to database after {MAX_CONNECT_ATTEMPTS} attempts")
                })
            }
        }
    };

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");
    Ok(())
}
