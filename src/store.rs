//! Data access for exercises, workouts and sets
//!
//! Thin pass-through queries that produce the workout snapshot the
//! aggregator consumes. Input validation for new sets and exercises
//! happens here, at the write boundary.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::models::{
  Exercise, ExerciseId, ExerciseUpdate, MovementCategory, NewExercise, NewSet, NewWorkout, SetId,
  Workout, WorkoutId, WorkoutSet,
};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("{entity} {id} not found")]
  NotFound { entity: &'static str, id: i64 },

  #[error("{entity} {id} is still used by {references} sets")]
  InUse {
    entity: &'static str,
    id: i64,
    references: i64,
  },

  #[error("Invalid input: {0}")]
  Invalid(String),
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Validation
/// ---------------------------------------------------------------------------

fn validate_set(set: &NewSet) -> Result<(), StoreError> {
  if set.reps < 1 {
    return Err(StoreError::Invalid(format!(
      "reps must be at least 1, got {}",
      set.reps
    )));
  }
  if !set.weight.is_finite() || set.weight < 0.0 {
    return Err(StoreError::Invalid(format!(
      "weight must be a non-negative number, got {}",
      set.weight
    )));
  }
  if let Some(rpe) = set.rpe {
    if !(1.0..=10.0).contains(&rpe) {
      return Err(StoreError::Invalid(format!(
        "rpe must be between 1 and 10, got {}",
        rpe
      )));
    }
  }
  Ok(())
}

fn validate_name(name: &str) -> Result<String, StoreError> {
  let trimmed = name.trim();
  if trimmed.is_empty() {
    return Err(StoreError::Invalid("exercise name must not be empty".into()));
  }
  Ok(trimmed.to_string())
}

/// Empty notes are stored as NULL
fn normalize_notes(notes: Option<String>) -> Option<String> {
  notes
    .map(|n| n.trim().to_string())
    .filter(|n| !n.is_empty())
}

/// ---------------------------------------------------------------------------
/// Exercises
/// ---------------------------------------------------------------------------

const EXERCISE_COLUMNS: &str = "id, name, category, notes, created_at";

/// All exercises ordered by name, optionally restricted to one category
pub async fn list_exercises(
  pool: &SqlitePool,
  category: Option<MovementCategory>,
) -> Result<Vec<Exercise>, StoreError> {
  let exercises = sqlx::query_as::<_, Exercise>(&format!(
    "SELECT {} FROM exercises WHERE ?1 IS NULL OR category = ?1 ORDER BY name ASC, id ASC",
    EXERCISE_COLUMNS
  ))
  .bind(category)
  .fetch_all(pool)
  .await?;

  Ok(exercises)
}

pub async fn get_exercise(pool: &SqlitePool, id: ExerciseId) -> Result<Exercise, StoreError> {
  sqlx::query_as::<_, Exercise>(&format!(
    "SELECT {} FROM exercises WHERE id = ?1",
    EXERCISE_COLUMNS
  ))
  .bind(id)
  .fetch_optional(pool)
  .await?
  .ok_or(StoreError::NotFound {
    entity: "exercise",
    id,
  })
}

pub async fn create_exercise(pool: &SqlitePool, new: NewExercise) -> Result<Exercise, StoreError> {
  let name = validate_name(&new.name)?;

  let exercise = sqlx::query_as::<_, Exercise>(&format!(
    "INSERT INTO exercises (name, category, notes) VALUES (?1, ?2, ?3) RETURNING {}",
    EXERCISE_COLUMNS
  ))
  .bind(name)
  .bind(new.category)
  .bind(normalize_notes(new.notes))
  .fetch_one(pool)
  .await?;

  info!(id = exercise.id, name = %exercise.name, "Created exercise");
  Ok(exercise)
}

pub async fn update_exercise(
  pool: &SqlitePool,
  id: ExerciseId,
  update: ExerciseUpdate,
) -> Result<Exercise, StoreError> {
  let name = update.name.as_deref().map(validate_name).transpose()?;
  let touch_notes = update.notes.is_some();
  let notes = normalize_notes(update.notes);

  let result = sqlx::query(
    r#"
    UPDATE exercises SET
      name = COALESCE(?1, name),
      category = COALESCE(?2, category),
      notes = CASE WHEN ?3 THEN ?4 ELSE notes END,
      updated_at = strftime('%Y-%m-%dT%H:%M:%SZ', 'now')
    WHERE id = ?5
    "#,
  )
  .bind(name)
  .bind(update.category)
  .bind(touch_notes)
  .bind(notes)
  .bind(id)
  .execute(pool)
  .await?;

  if result.rows_affected() == 0 {
    return Err(StoreError::NotFound {
      entity: "exercise",
      id,
    });
  }

  debug!(id, "Updated exercise");
  get_exercise(pool, id).await
}

/// Delete an exercise that no set references
pub async fn delete_exercise(pool: &SqlitePool, id: ExerciseId) -> Result<(), StoreError> {
  let references: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sets WHERE exercise_id = ?1")
    .bind(id)
    .fetch_one(pool)
    .await?;

  if references > 0 {
    return Err(StoreError::InUse {
      entity: "exercise",
      id,
      references,
    });
  }

  let result = sqlx::query("DELETE FROM exercises WHERE id = ?1")
    .bind(id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(StoreError::NotFound {
      entity: "exercise",
      id,
    });
  }

  info!(id, "Deleted exercise");
  Ok(())
}

pub async fn count_exercises(pool: &SqlitePool) -> Result<i64, StoreError> {
  Ok(sqlx::query_scalar("SELECT COUNT(*) FROM exercises").fetch_one(pool).await?)
}

/// ---------------------------------------------------------------------------
/// Workouts and Sets
/// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct WorkoutRow {
  id: WorkoutId,
  date: DateTime<Utc>,
  notes: Option<String>,
}

const SET_SELECT: &str = r#"
  SELECT
    s.id, s.workout_id, s.exercise_id, s.reps, s.weight, s.rpe,
    e.name AS exercise_name, e.category AS exercise_category,
    e.notes AS exercise_notes, e.created_at AS exercise_created_at
  FROM sets s
  JOIN exercises e ON e.id = s.exercise_id
"#;

fn set_from_row(row: &SqliteRow) -> Result<WorkoutSet, sqlx::Error> {
  let exercise_id: ExerciseId = row.try_get("exercise_id")?;
  Ok(WorkoutSet {
    id: row.try_get("id")?,
    workout_id: row.try_get("workout_id")?,
    exercise_id,
    reps: row.try_get("reps")?,
    weight: row.try_get("weight")?,
    rpe: row.try_get("rpe")?,
    exercise: Exercise {
      id: exercise_id,
      name: row.try_get("exercise_name")?,
      category: row.try_get("exercise_category")?,
      notes: row.try_get("exercise_notes")?,
      created_at: row.try_get("exercise_created_at")?,
    },
  })
}

fn attach_sets(rows: Vec<WorkoutRow>, sets: Vec<WorkoutSet>) -> Vec<Workout> {
  let mut by_workout: HashMap<WorkoutId, Vec<WorkoutSet>> = HashMap::new();
  for set in sets {
    by_workout.entry(set.workout_id).or_default().push(set);
  }

  rows
    .into_iter()
    .map(|row| Workout {
      id: row.id,
      date: row.date,
      notes: row.notes,
      sets: by_workout.remove(&row.id).unwrap_or_default(),
    })
    .collect()
}

/// Most recent workouts first, each with its sets and their exercises.
/// `None` loads every workout.
pub async fn list_workouts(pool: &SqlitePool, limit: Option<i64>) -> Result<Vec<Workout>, StoreError> {
  if let Some(n) = limit.filter(|n| *n < 1) {
    return Err(StoreError::Invalid(format!(
      "limit must be at least 1, got {}",
      n
    )));
  }
  // SQLite treats a negative LIMIT as no limit
  let limit = limit.unwrap_or(-1);

  // Both reads share one transaction so sets match the workout rows
  let mut tx = pool.begin().await?;

  let rows = sqlx::query_as::<_, WorkoutRow>(
    "SELECT id, date, notes FROM workouts ORDER BY date DESC, id DESC LIMIT ?1",
  )
  .bind(limit)
  .fetch_all(&mut *tx)
  .await?;

  let sets = sqlx::query(&format!(
    r#"{}
    WHERE s.workout_id IN (
      SELECT id FROM workouts ORDER BY date DESC, id DESC LIMIT ?1
    )
    ORDER BY s.created_at ASC, s.id ASC"#,
    SET_SELECT
  ))
  .bind(limit)
  .fetch_all(&mut *tx)
  .await?
  .iter()
  .map(set_from_row)
  .collect::<Result<Vec<_>, _>>()?;

  tx.commit().await?;

  debug!(workouts = rows.len(), sets = sets.len(), "Loaded workouts");
  Ok(attach_sets(rows, sets))
}

/// One workout with its sets in the order they were logged
pub async fn get_workout(pool: &SqlitePool, id: WorkoutId) -> Result<Workout, StoreError> {
  let row = sqlx::query_as::<_, WorkoutRow>("SELECT id, date, notes FROM workouts WHERE id = ?1")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound {
      entity: "workout",
      id,
    })?;

  let sets = sqlx::query(&format!(
    "{} WHERE s.workout_id = ?1 ORDER BY s.created_at ASC, s.id ASC",
    SET_SELECT
  ))
  .bind(id)
  .fetch_all(pool)
  .await?
  .iter()
  .map(set_from_row)
  .collect::<Result<Vec<_>, _>>()?;

  Ok(Workout {
    id: row.id,
    date: row.date,
    notes: row.notes,
    sets,
  })
}

async fn get_set(pool: &SqlitePool, id: SetId) -> Result<WorkoutSet, StoreError> {
  let row = sqlx::query(&format!("{} WHERE s.id = ?1", SET_SELECT))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound { entity: "set", id })?;

  Ok(set_from_row(&row)?)
}

/// Insert a workout and all of its sets in one transaction
pub async fn create_workout(pool: &SqlitePool, new: NewWorkout) -> Result<Workout, StoreError> {
  for set in &new.sets {
    validate_set(set)?;
  }

  let mut tx = pool.begin().await?;

  let exercise_ids: HashSet<ExerciseId> = new.sets.iter().map(|s| s.exercise_id).collect();
  for exercise_id in exercise_ids {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM exercises WHERE id = ?1")
      .bind(exercise_id)
      .fetch_optional(&mut *tx)
      .await?;
    if exists.is_none() {
      return Err(StoreError::NotFound {
        entity: "exercise",
        id: exercise_id,
      });
    }
  }

  let date = new.date.unwrap_or_else(Utc::now);
  let workout_id: WorkoutId =
    sqlx::query_scalar("INSERT INTO workouts (date, notes) VALUES (?1, ?2) RETURNING id")
      .bind(date)
      .bind(normalize_notes(new.notes))
      .fetch_one(&mut *tx)
      .await?;

  for set in &new.sets {
    sqlx::query(
      "INSERT INTO sets (workout_id, exercise_id, reps, weight, rpe) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(workout_id)
    .bind(set.exercise_id)
    .bind(set.reps)
    .bind(set.weight)
    .bind(set.rpe)
    .execute(&mut *tx)
    .await?;
  }

  tx.commit().await?;

  info!(id = workout_id, sets = new.sets.len(), "Created workout");
  get_workout(pool, workout_id).await
}

/// Delete a workout; its sets go with it
pub async fn delete_workout(pool: &SqlitePool, id: WorkoutId) -> Result<(), StoreError> {
  let result = sqlx::query("DELETE FROM workouts WHERE id = ?1")
    .bind(id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(StoreError::NotFound {
      entity: "workout",
      id,
    });
  }

  info!(id, "Deleted workout");
  Ok(())
}

pub async fn add_set_to_workout(
  pool: &SqlitePool,
  workout_id: WorkoutId,
  set: NewSet,
) -> Result<WorkoutSet, StoreError> {
  validate_set(&set)?;

  let workout: Option<i64> = sqlx::query_scalar("SELECT id FROM workouts WHERE id = ?1")
    .bind(workout_id)
    .fetch_optional(pool)
    .await?;
  if workout.is_none() {
    return Err(StoreError::NotFound {
      entity: "workout",
      id: workout_id,
    });
  }

  get_exercise(pool, set.exercise_id).await?;

  let set_id: SetId = sqlx::query_scalar(
    "INSERT INTO sets (workout_id, exercise_id, reps, weight, rpe) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
  )
  .bind(workout_id)
  .bind(set.exercise_id)
  .bind(set.reps)
  .bind(set.weight)
  .bind(set.rpe)
  .fetch_one(pool)
  .await?;

  debug!(workout_id, set_id, "Added set");
  get_set(pool, set_id).await
}

pub async fn delete_set(pool: &SqlitePool, id: SetId) -> Result<(), StoreError> {
  let result = sqlx::query("DELETE FROM sets WHERE id = ?1")
    .bind(id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(StoreError::NotFound { entity: "set", id });
  }

  debug!(id, "Deleted set");
  Ok(())
}

pub async fn count_sets(pool: &SqlitePool) -> Result<i64, StoreError> {
  Ok(sqlx::query_scalar("SELECT COUNT(*) FROM sets").fetch_one(pool).await?)
}
