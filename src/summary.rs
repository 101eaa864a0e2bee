//! Display-ready summaries built on the aggregator
//!
//! `DashboardStats` backs the home screen; `WorkoutBreakdown` backs the
//! workout detail view. Both own their data so they can outlive the
//! snapshot they were computed from.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregator::{
  compute_volume, count_workouts_in_window, group_sets_by_exercise, total_set_count,
  volume_in_window, week_window_start, StreakPolicy, StreakUnit,
};
use crate::models::{Exercise, ExerciseId, MovementCategory, Workout, WorkoutId, WorkoutSet};

/// Workouts listed on the dashboard
const RECENT_WORKOUTS_SHOWN: usize = 3;

/// Exercises named per recent workout before collapsing into "+N more"
const EXERCISES_PER_PREVIEW: usize = 3;

/// ---------------------------------------------------------------------------
/// Dashboard
/// ---------------------------------------------------------------------------

/// How many sets of one exercise a workout contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTally {
  pub exercise_id: ExerciseId,
  pub name: String,
  pub category: MovementCategory,
  pub set_count: usize,
}

impl ExerciseTally {
  fn new(exercise: &Exercise, set_count: usize) -> Self {
    Self {
      exercise_id: exercise.id,
      name: exercise.name.clone(),
      category: exercise.category,
      set_count,
    }
  }
}

/// Compact card for one recent workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentWorkout {
  pub id: WorkoutId,
  pub date: DateTime<Utc>,
  pub set_count: usize,
  pub volume: f64,
  pub exercises: Vec<ExerciseTally>,
  /// Exercises beyond the preview
  pub more_exercises: usize,
}

impl RecentWorkout {
  pub fn from_workout(workout: &Workout) -> Self {
    let groups = group_sets_by_exercise(&workout.sets);
    let (shown, more_exercises) = groups.preview(EXERCISES_PER_PREVIEW);

    Self {
      id: workout.id,
      date: workout.date,
      set_count: workout.sets.len(),
      volume: compute_volume(&workout.sets),
      exercises: shown
        .into_iter()
        .map(|(exercise, count)| ExerciseTally::new(exercise, count))
        .collect(),
      more_exercises,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub workouts_this_week: usize,
  pub total_sets: usize,
  /// Volume logged since the start of the current week
  pub weekly_volume: f64,
  pub streak: u32,
  pub streak_unit: StreakUnit,
  pub exercise_count: usize,
  pub recent_workouts: Vec<RecentWorkout>,
}

impl DashboardStats {
  /// Compute dashboard stats from a workout snapshot.
  ///
  /// `exercise_count` is the size of the exercise library, which can include
  /// exercises no workout references yet.
  pub fn compute(
    workouts: &[Workout],
    exercise_count: usize,
    now: DateTime<Utc>,
    policy: &StreakPolicy,
  ) -> Self {
    let week_start = week_window_start(now);
    let week_end = week_start + Duration::days(7);

    let mut by_recency: Vec<&Workout> = workouts.iter().collect();
    by_recency.sort_by(|a, b| b.date.cmp(&a.date));

    let recent_workouts = by_recency
      .into_iter()
      .take(RECENT_WORKOUTS_SHOWN)
      .map(RecentWorkout::from_workout)
      .collect();

    Self {
      workouts_this_week: count_workouts_in_window(workouts, week_start, week_end),
      total_sets: total_set_count(workouts),
      weekly_volume: volume_in_window(workouts, week_start, week_end),
      streak: policy.compute(workouts, now),
      streak_unit: policy.unit,
      exercise_count,
      recent_workouts,
    }
  }

  /// True when there is no exercise library yet and the dashboard should
  /// prompt to create one
  pub fn needs_exercise_library(&self) -> bool {
    self.exercise_count == 0
  }
}

/// ---------------------------------------------------------------------------
/// Workout Detail
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSets {
  pub exercise: Exercise,
  pub sets: Vec<WorkoutSet>,
  pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutBreakdown {
  pub set_count: usize,
  pub exercise_count: usize,
  pub total_volume: f64,
  /// In the order each exercise was first logged
  pub groups: Vec<ExerciseSets>,
}

impl WorkoutBreakdown {
  pub fn compute(workout: &Workout) -> Self {
    let groups: Vec<ExerciseSets> = group_sets_by_exercise(&workout.sets)
      .iter()
      .map(|group| ExerciseSets {
        exercise: group.exercise.clone(),
        sets: group.sets.iter().map(|s| (*s).clone()).collect(),
        volume: group.volume(),
      })
      .collect();

    Self {
      set_count: workout.sets.len(),
      exercise_count: groups.len(),
      total_volume: compute_volume(&workout.sets),
      groups,
    }
  }
}

/// A workout together with its breakdown, as the detail view consumes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDetail {
  pub workout: Workout,
  pub breakdown: WorkoutBreakdown,
}

impl From<Workout> for WorkoutDetail {
  fn from(workout: Workout) -> Self {
    let breakdown = WorkoutBreakdown::compute(&workout);
    Self { workout, breakdown }
  }
}
