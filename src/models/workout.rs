use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exercise::{Exercise, ExerciseId};

pub type WorkoutId = i64;
pub type SetId = i64;

/// A logged set with its exercise already resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
  pub id: SetId,
  pub workout_id: WorkoutId,
  pub exercise_id: ExerciseId,
  pub reps: i64,
  pub weight: f64,
  /// Rate of perceived exertion, 1-10 in half-point steps
  pub rpe: Option<f64>,
  pub exercise: Exercise,
}

impl WorkoutSet {
  /// reps x weight
  pub fn volume(&self) -> f64 {
    self.reps as f64 * self.weight
  }
}

/// A workout session as handed to the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
  pub id: WorkoutId,
  pub date: DateTime<Utc>,
  pub notes: Option<String>,
  pub sets: Vec<WorkoutSet>,
}

/// For inserting a workout together with its sets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWorkout {
  /// Defaults to now when absent
  pub date: Option<DateTime<Utc>>,
  pub notes: Option<String>,
  pub sets: Vec<NewSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSet {
  pub exercise_id: ExerciseId,
  pub reps: i64,
  pub weight: f64,
  pub rpe: Option<f64>,
}
