//! Deterministic aggregation over a workout snapshot
//!
//! Everything here is a pure function of its input: calendar bucketing,
//! window counts, streaks, per-exercise grouping and training volume.
//! Inputs are borrowed and never mutated; all bucketing is done on UTC
//! calendar days with weeks starting on Sunday. Workout dates and the
//! reference instant are both read in UTC.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::models::{Exercise, ExerciseId, MovementCategory, Workout, WorkoutSet};

/// ---------------------------------------------------------------------------
/// Calendar Bucketing
/// ---------------------------------------------------------------------------

/// Midnight of the reference's calendar day
pub fn day_start(reference: DateTime<Utc>) -> DateTime<Utc> {
  reference.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// The Sunday on or before `day`
pub fn week_start_date(day: NaiveDate) -> NaiveDate {
  let offset = day.weekday().num_days_from_sunday();
  day.checked_sub_days(Days::new(offset.into())).unwrap_or(day)
}

/// Start of the reference's Sunday-to-Saturday week, at midnight.
///
/// Any two instants in the same week map to the same value.
pub fn week_window_start(reference: DateTime<Utc>) -> DateTime<Utc> {
  week_start_date(reference.date_naive())
    .and_time(NaiveTime::MIN)
    .and_utc()
}

/// Number of workouts dated in `[start, end_exclusive)`
pub fn count_workouts_in_window(
  workouts: &[Workout],
  start: DateTime<Utc>,
  end_exclusive: DateTime<Utc>,
) -> usize {
  workouts
    .iter()
    .filter(|w| w.date >= start && w.date < end_exclusive)
    .count()
}

/// ---------------------------------------------------------------------------
/// Streaks
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakUnit {
  Day,
  Week,
}

impl StreakUnit {
  /// How many buckets the backward walk may visit, the current one included
  pub fn max_lookback(&self) -> u32 {
    match self {
      StreakUnit::Day => 30,
      StreakUnit::Week => 52,
    }
  }

  /// Bucket key: the calendar day, or the Sunday starting the week
  pub fn bucket_key(&self, at: DateTime<Utc>) -> NaiveDate {
    let day = at.date_naive();
    match self {
      StreakUnit::Day => day,
      StreakUnit::Week => week_start_date(day),
    }
  }

  fn bucket_before(&self, key: NaiveDate, offset: u32) -> Option<NaiveDate> {
    let days = match self {
      StreakUnit::Day => u64::from(offset),
      StreakUnit::Week => u64::from(offset) * 7,
    };
    key.checked_sub_days(Days::new(days))
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      StreakUnit::Day => "day",
      StreakUnit::Week => "week",
    }
  }
}

impl std::fmt::Display for StreakUnit {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for StreakUnit {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "day" => Ok(Self::Day),
      "week" => Ok(Self::Week),
      _ => Err(format!("Unknown streak unit: {}", s)),
    }
  }
}

fn bucket_workouts(workouts: &[Workout], unit: StreakUnit) -> HashMap<NaiveDate, Vec<&Workout>> {
  let mut buckets: HashMap<NaiveDate, Vec<&Workout>> = HashMap::new();
  for workout in workouts {
    buckets.entry(unit.bucket_key(workout.date)).or_default().push(workout);
  }
  buckets
}

fn bucket_at<'a, 'w>(
  buckets: &'a HashMap<NaiveDate, Vec<&'w Workout>>,
  key: NaiveDate,
) -> &'a [&'w Workout] {
  buckets.get(&key).map_or(&[][..], Vec::as_slice)
}

/// Count consecutive qualifying buckets walking back from `today`'s bucket.
///
/// The bucket containing `today` is still in progress: it adds to the streak
/// when it qualifies but never ends the walk when it doesn't. Every earlier
/// bucket must qualify, and the first one that fails stops the count.
pub fn compute_streak<F>(
  workouts: &[Workout],
  today: DateTime<Utc>,
  unit: StreakUnit,
  qualifies: F,
) -> u32
where
  F: Fn(&[&Workout]) -> bool,
{
  let buckets = bucket_workouts(workouts, unit);
  let current = unit.bucket_key(today);
  let mut streak = 0;

  // Phase 1: current bucket
  if qualifies(bucket_at(&buckets, current)) {
    streak += 1;
  }

  // Phase 2: strictly earlier buckets
  for offset in 1..unit.max_lookback() {
    let Some(key) = unit.bucket_before(current, offset) else {
      break;
    };
    if !qualifies(bucket_at(&buckets, key)) {
      break;
    }
    streak += 1;
  }

  streak
}

/// A streak rule: bucket size plus the minimum workouts a bucket needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakPolicy {
  pub unit: StreakUnit,
  pub min_workouts: usize,
}

impl StreakPolicy {
  /// At least one workout every day
  pub fn daily() -> Self {
    Self {
      unit: StreakUnit::Day,
      min_workouts: 1,
    }
  }

  /// At least three workouts every week
  pub fn weekly() -> Self {
    Self {
      unit: StreakUnit::Week,
      min_workouts: 3,
    }
  }

  /// The conventional policy for a unit
  pub fn for_unit(unit: StreakUnit) -> Self {
    match unit {
      StreakUnit::Day => Self::daily(),
      StreakUnit::Week => Self::weekly(),
    }
  }

  pub fn qualifies(&self, bucket: &[&Workout]) -> bool {
    bucket.len() >= self.min_workouts
  }

  pub fn compute(&self, workouts: &[Workout], today: DateTime<Utc>) -> u32 {
    compute_streak(workouts, today, self.unit, |bucket| self.qualifies(bucket))
  }
}

impl Default for StreakPolicy {
  fn default() -> Self {
    Self::daily()
  }
}

/// ---------------------------------------------------------------------------
/// Grouping Sets by Exercise
/// ---------------------------------------------------------------------------

/// All sets of one exercise, in the order they were logged
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseGroup<'a> {
  pub exercise: &'a Exercise,
  pub sets: Vec<&'a WorkoutSet>,
}

impl<'a> ExerciseGroup<'a> {
  pub fn set_count(&self) -> usize {
    self.sets.len()
  }

  pub fn volume(&self) -> f64 {
    compute_volume(self.sets.iter().copied())
  }
}

/// Exercise groups keyed by exercise id, iterated in first-seen order
#[derive(Debug, Clone, Default)]
pub struct ExerciseGroups<'a> {
  groups: Vec<ExerciseGroup<'a>>,
  index: HashMap<ExerciseId, usize>,
}

impl<'a> ExerciseGroups<'a> {
  pub fn get(&self, exercise_id: ExerciseId) -> Option<&ExerciseGroup<'a>> {
    self.index.get(&exercise_id).map(|&idx| &self.groups[idx])
  }

  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, ExerciseGroup<'a>> {
    self.groups.iter()
  }

  pub fn into_vec(self) -> Vec<ExerciseGroup<'a>> {
    self.groups
  }

  /// Set counts for the first `limit` exercises, plus how many were left out
  pub fn preview(&self, limit: usize) -> (Vec<(&'a Exercise, usize)>, usize) {
    let shown = self
      .groups
      .iter()
      .take(limit)
      .map(|g| (g.exercise, g.set_count()))
      .collect();
    (shown, self.groups.len().saturating_sub(limit))
  }

  fn push(&mut self, set: &'a WorkoutSet) {
    match self.index.get(&set.exercise_id) {
      Some(&idx) => self.groups[idx].sets.push(set),
      None => {
        self.index.insert(set.exercise_id, self.groups.len());
        self.groups.push(ExerciseGroup {
          exercise: &set.exercise,
          sets: vec![set],
        });
      }
    }
  }
}

impl<'g, 'a> IntoIterator for &'g ExerciseGroups<'a> {
  type Item = &'g ExerciseGroup<'a>;
  type IntoIter = std::slice::Iter<'g, ExerciseGroup<'a>>;

  fn into_iter(self) -> Self::IntoIter {
    self.groups.iter()
  }
}

impl Serialize for ExerciseGroups<'_> {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    self.groups.serialize(serializer)
  }
}

/// Group sets by the exercise they reference.
///
/// Exercises appear in the order first seen; each set lands in exactly one group.
pub fn group_sets_by_exercise(sets: &[WorkoutSet]) -> ExerciseGroups<'_> {
  let mut groups = ExerciseGroups::default();
  for set in sets {
    groups.push(set);
  }
  groups
}

/// ---------------------------------------------------------------------------
/// Volume
/// ---------------------------------------------------------------------------

/// Sum of reps x weight; 0 for no sets
pub fn compute_volume<'a, I>(sets: I) -> f64
where
  I: IntoIterator<Item = &'a WorkoutSet>,
{
  sets.into_iter().fold(0.0, |total, set| total + set.volume())
}

pub fn workouts_volume(workouts: &[Workout]) -> f64 {
  workouts.iter().fold(0.0, |total, w| total + compute_volume(&w.sets))
}

/// Volume of the workouts dated in `[start, end_exclusive)`
pub fn volume_in_window(
  workouts: &[Workout],
  start: DateTime<Utc>,
  end_exclusive: DateTime<Utc>,
) -> f64 {
  workouts
    .iter()
    .filter(|w| w.date >= start && w.date < end_exclusive)
    .fold(0.0, |total, w| total + compute_volume(&w.sets))
}

pub fn total_set_count(workouts: &[Workout]) -> usize {
  workouts.iter().map(|w| w.sets.len()).sum()
}

/// ---------------------------------------------------------------------------
/// Exercise Library
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup<'a> {
  pub category: MovementCategory,
  pub label: &'static str,
  pub exercises: Vec<&'a Exercise>,
}

/// Exercises grouped by movement category, categories in library order.
/// Categories without exercises are left out.
pub fn group_exercises_by_category(exercises: &[Exercise]) -> Vec<CategoryGroup<'_>> {
  let mut by_category: BTreeMap<MovementCategory, Vec<&Exercise>> = BTreeMap::new();
  for exercise in exercises {
    by_category.entry(exercise.category).or_default().push(exercise);
  }

  by_category
    .into_iter()
    .map(|(category, exercises)| CategoryGroup {
      category,
      label: category.label(),
      exercises,
    })
    .collect()
}
