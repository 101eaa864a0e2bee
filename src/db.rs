use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::AppConfig;

pub type DbPool = SqlitePool;

/// Application state shared by the command layer
pub struct AppState {
  pub db: DbPool,
  pub config: AppConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
  #[error("Failed to open database: {0}")]
  Connect(#[from] sqlx::Error),

  #[error("Failed to run migrations: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &AppConfig) -> Result<DbPool, DbError> {
  info!(url = %config.database_url, "Initializing database");

  let options = SqliteConnectOptions::from_str(&config.database_url)?
    .create_if_missing(true)
    .foreign_keys(true);

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect_with(options)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");

  Ok(pool)
}
