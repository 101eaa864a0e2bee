//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Fixed-date helpers
//! - Helper assertions

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::models::{Exercise, MovementCategory, NewExercise, NewSet, NewWorkout, Workout, WorkoutSet};
use crate::store;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::query("PRAGMA foreign_keys = ON")
    .execute(&pool)
    .await
    .expect("Failed to enable foreign keys");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed one exercise per movement category, in category order
pub async fn seed_test_exercises(pool: &SqlitePool) -> Vec<Exercise> {
  let library = [
    ("Bench Press", MovementCategory::UpperPush),
    ("Pull Up", MovementCategory::UpperPull),
    ("Back Squat", MovementCategory::LowerPush),
    ("Deadlift", MovementCategory::LowerHinge),
    ("Plank", MovementCategory::Core),
  ];

  let mut exercises = Vec::new();
  for (name, category) in library {
    let exercise = store::create_exercise(
      pool,
      NewExercise {
        name: name.to_string(),
        category,
        notes: None,
      },
    )
    .await
    .expect("Failed to seed exercise");
    exercises.push(exercise);
  }

  exercises
}

/// Seed `count` workouts, one per day going back from `today`,
/// each with three sets of the first exercise and one of the second
pub async fn seed_test_workouts(
  pool: &SqlitePool,
  exercises: &[Exercise],
  today: DateTime<Utc>,
  count: usize,
) -> Vec<i64> {
  let mut ids = Vec::new();

  for i in 0..count {
    let sets = vec![
      new_set(exercises[0].id, 5, 100.0),
      new_set(exercises[0].id, 5, 100.0),
      new_set(exercises[0].id, 5, 100.0),
      new_set(exercises[1].id, 8, 0.0),
    ];
    let workout = store::create_workout(
      pool,
      NewWorkout {
        date: Some(today - Duration::days(i as i64)),
        notes: Some(format!("session {}", i)),
        sets,
      },
    )
    .await
    .expect("Failed to seed workout");
    ids.push(workout.id);
  }

  ids
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_exercise(id: i64, name: &str, category: MovementCategory) -> Exercise {
  Exercise {
    id,
    name: name.to_string(),
    category,
    notes: None,
    created_at: utc_date(2024, 1, 1),
  }
}

pub fn mock_set(id: i64, workout_id: i64, exercise: &Exercise, reps: i64, weight: f64) -> WorkoutSet {
  WorkoutSet {
    id,
    workout_id,
    exercise_id: exercise.id,
    reps,
    weight,
    rpe: None,
    exercise: exercise.clone(),
  }
}

pub fn mock_workout(id: i64, date: DateTime<Utc>, sets: Vec<WorkoutSet>) -> Workout {
  Workout {
    id,
    date,
    notes: None,
    sets,
  }
}

/// One set-less workout per date, ids assigned in order
pub fn mock_workouts_on(dates: &[DateTime<Utc>]) -> Vec<Workout> {
  dates
    .iter()
    .enumerate()
    .map(|(i, date)| mock_workout(i as i64 + 1, *date, Vec::new()))
    .collect()
}

pub fn new_set(exercise_id: i64, reps: i64, weight: f64) -> NewSet {
  NewSet {
    exercise_id,
    reps,
    weight,
    rpe: None,
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Midnight UTC on the given day
pub fn utc_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
  utc_datetime(year, month, day, 0, 0)
}

pub fn utc_datetime(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(year, month, day, hour, minute, 0)
    .single()
    .expect("Invalid test date")
}

pub fn naive_date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("Invalid test date")
}

/// `reference` shifted back by whole days, keeping the time of day
pub fn days_before(reference: DateTime<Utc>, days: i64) -> DateTime<Utc> {
  reference - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('exercises', 'workouts', 'sets')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 3, "Expected 3 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_workouts_returns_correct_count() {
    let pool = setup_test_db().await;

    let exercises = seed_test_exercises(&pool).await;
    assert_eq!(exercises.len(), 5);

    let ids = seed_test_workouts(&pool, &exercises, utc_date(2024, 6, 12), 4).await;
    assert_eq!(ids.len(), 4);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sets")
      .fetch_one(&pool)
      .await
      .expect("Failed to count sets");
    assert_eq!(count, 16);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let squat = mock_exercise(1, "Back Squat", MovementCategory::LowerPush);
    let set = mock_set(10, 2, &squat, 5, 140.0);
    assert_eq!(set.exercise_id, 1);
    assert_eq!(set.exercise.name, "Back Squat");

    let workouts = mock_workouts_on(&[utc_date(2024, 6, 12), utc_date(2024, 6, 11)]);
    assert_eq!(workouts.len(), 2);
    assert_eq!(workouts[1].id, 2);
  }

  #[test]
  fn test_time_helpers() {
    let noon = utc_datetime(2024, 6, 12, 12, 0);
    assert_eq!(days_before(noon, 3), utc_datetime(2024, 6, 9, 12, 0));
    assert_eq!(utc_date(2024, 6, 12).date_naive(), naive_date(2024, 6, 12));
  }
}
