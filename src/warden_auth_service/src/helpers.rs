use secrecy::ExposeSecret;
use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions};
use thiserror::Error;
use warden_adapters::config::PostgresSettings;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Failed to connect to PostgreSQL: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] MigrateError),
}

/// Connect to PostgreSQL and bring the schema up to date.
///
/// # Returns
/// A configured PgPool ready for the account and refresh token stores
pub async fn configure_postgresql(settings: &PostgresSettings) -> Result<PgPool, BootstrapError> {
    let pg_pool = get_postgres_pool(settings.url.expose_secret(), settings.max_connections).await?;

    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    Ok(pg_pool)
}

/// Create a PostgreSQL connection pool
///
/// # Arguments
/// * `url` - Database connection URL
/// * `max_connections` - Upper bound on pooled connections
pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}
