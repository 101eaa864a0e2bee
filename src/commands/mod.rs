pub mod dashboard;
pub mod exercises;

use tracing::debug;

use crate::db::AppState;
use crate::models::{NewWorkout, Workout, WorkoutId};
use crate::store::{self, StoreError};
use crate::summary::WorkoutDetail;

pub use dashboard::get_dashboard;
pub use exercises::{add_exercise, get_exercise_library};

/// Latest workouts, most recent first. Falls back to the configured page size.
pub async fn get_workouts(state: &AppState, limit: Option<i64>) -> Result<Vec<Workout>, StoreError> {
  let limit = limit.unwrap_or(state.config.recent_workouts);
  if limit < 1 {
    return Err(StoreError::Invalid(format!(
      "limit must be at least 1, got {}",
      limit
    )));
  }
  store::list_workouts(&state.db, Some(limit)).await
}

/// One workout with its sets grouped by exercise
pub async fn get_workout_detail(state: &AppState, id: WorkoutId) -> Result<WorkoutDetail, StoreError> {
  let workout = store::get_workout(&state.db, id).await?;
  debug!(id, sets = workout.sets.len(), "Loaded workout detail");
  Ok(WorkoutDetail::from(workout))
}

/// Record a workout with zero or more sets
pub async fn log_workout(state: &AppState, new: NewWorkout) -> Result<WorkoutDetail, StoreError> {
  let workout = store::create_workout(&state.db, new).await?;
  Ok(WorkoutDetail::from(workout))
}

pub async fn remove_workout(state: &AppState, id: WorkoutId) -> Result<(), StoreError> {
  store::delete_workout(&state.db, id).await
}
