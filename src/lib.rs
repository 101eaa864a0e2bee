pub mod aggregator;
pub mod commands;
pub mod config;
pub mod db;
pub mod models;
pub mod store;
pub mod summary;

#[cfg(test)]
pub mod test_utils;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{AppConfig, ConfigError};
use db::{AppState, DbError};
use store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Db(#[from] DbError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("Failed to start runtime: {0}")]
  Runtime(#[from] std::io::Error),

  #[error("Failed to render output: {0}")]
  Output(#[from] serde_json::Error),
}

/// Load configuration, open the database and print the dashboard as JSON
pub fn run() -> Result<(), AppError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  let config = AppConfig::from_env()?;
  init_logging(&config.log_filter);

  let runtime = tokio::runtime::Builder::new_multi_thread()
    .enable_all()
    .build()?;

  runtime.block_on(async move {
    let pool = db::initialize_db(&config).await?;
    let state = AppState { db: pool, config };

    let stats = commands::get_dashboard(&state, Utc::now()).await?;
    info!(streak = stats.streak, workouts_this_week = stats.workouts_this_week, "Dashboard ready");
    println!("{}", serde_json::to_string_pretty(&stats)?);

    state.db.close().await;
    Ok::<(), AppError>(())
  })
}

/// Logs go to stderr so stdout stays valid JSON
fn init_logging(filter: &str) {
  let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}
