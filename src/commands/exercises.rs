use serde::Serialize;

use crate::aggregator::group_exercises_by_category;
use crate::db::AppState;
use crate::models::{Exercise, MovementCategory, NewExercise};
use crate::store::{self, StoreError};

/// One category section of the exercise library
#[derive(Debug, Clone, Serialize)]
pub struct LibrarySection {
  pub category: MovementCategory,
  pub label: &'static str,
  pub exercises: Vec<Exercise>,
}

/// Exercises grouped by movement category, optionally filtered to one
pub async fn get_exercise_library(
  state: &AppState,
  category: Option<MovementCategory>,
) -> Result<Vec<LibrarySection>, StoreError> {
  let exercises = store::list_exercises(&state.db, category).await?;

  Ok(
    group_exercises_by_category(&exercises)
      .into_iter()
      .map(|group| LibrarySection {
        category: group.category,
        label: group.label,
        exercises: group.exercises.into_iter().cloned().collect(),
      })
      .collect(),
  )
}

pub async fn add_exercise(state: &AppState, new: NewExercise) -> Result<Exercise, StoreError> {
  store::create_exercise(&state.db, new).await
}
