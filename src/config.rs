use std::env;

use crate::aggregator::{StreakPolicy, StreakUnit};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DEFAULT_DATABASE_URL: &str = "sqlite://lift-log.db?mode=rwc";
const DEFAULT_RECENT_WORKOUTS: i64 = 50;
const DEFAULT_LOG_FILTER: &str = "info";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Invalid value for {name}: {reason}")]
  Invalid { name: String, reason: String },
}

impl ConfigError {
  fn invalid(name: &str, reason: impl Into<String>) -> Self {
    ConfigError::Invalid {
      name: name.to_string(),
      reason: reason.into(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Application Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub database_url: String,
  /// Rule the dashboard streak is computed with
  pub streak: StreakPolicy,
  /// Default page size of the workout list
  pub recent_workouts: i64,
  pub log_filter: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      streak: StreakPolicy::default(),
      recent_workouts: DEFAULT_RECENT_WORKOUTS,
      log_filter: DEFAULT_LOG_FILTER.to_string(),
    }
  }
}

impl AppConfig {
  /// Read configuration from the process environment.
  /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
  pub fn from_env() -> Result<Self, ConfigError> {
    let database_url =
      env::var("LIFT_LOG_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let unit = match env::var("LIFT_LOG_STREAK_UNIT") {
      Ok(raw) => raw
        .trim()
        .to_lowercase()
        .parse::<StreakUnit>()
        .map_err(|e| ConfigError::invalid("LIFT_LOG_STREAK_UNIT", e))?,
      Err(_) => StreakUnit::Day,
    };

    let mut streak = StreakPolicy::for_unit(unit);
    if let Some(min) = parse_positive("LIFT_LOG_STREAK_MIN_WORKOUTS")? {
      streak.min_workouts = min as usize;
    }

    let recent_workouts =
      parse_positive("LIFT_LOG_RECENT_WORKOUTS")?.unwrap_or(DEFAULT_RECENT_WORKOUTS);

    let log_filter = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

    Ok(Self {
      database_url,
      streak,
      recent_workouts,
      log_filter,
    })
  }
}

fn parse_positive(name: &str) -> Result<Option<i64>, ConfigError> {
  let Ok(raw) = env::var(name) else {
    return Ok(None);
  };
  let value: i64 = raw
    .trim()
    .parse()
    .map_err(|_| ConfigError::invalid(name, format!("expected a whole number, got {:?}", raw)))?;
  if value < 1 {
    return Err(ConfigError::invalid(name, "must be at least 1"));
  }
  Ok(Some(value))
}
