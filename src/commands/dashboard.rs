use chrono::{DateTime, Utc};
use tracing::debug;

use crate::db::AppState;
use crate::store::{self, StoreError};
use crate::summary::DashboardStats;

/// Dashboard stats as of `now`, over the full workout history
pub async fn get_dashboard(state: &AppState, now: DateTime<Utc>) -> Result<DashboardStats, StoreError> {
  let workouts = store::list_workouts(&state.db, None).await?;
  let exercise_count = store::count_exercises(&state.db).await?;

  let stats = DashboardStats::compute(
    &workouts,
    exercise_count.max(0) as usize,
    now,
    &state.config.streak,
  );

  debug!(
    workouts = workouts.len(),
    streak = stats.streak,
    unit = %stats.streak_unit,
    "Computed dashboard"
  );

  Ok(stats)
}
