use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ExerciseId = i64;

/// ---------------------------------------------------------------------------
/// Movement Category
/// ---------------------------------------------------------------------------

/// Fixed classification tag for an exercise.
///
/// Declaration order is the display order of the exercise library.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MovementCategory {
  UpperPush,
  UpperPull,
  LowerPush,
  LowerHinge,
  Core,
}

impl MovementCategory {
  pub const ALL: [MovementCategory; 5] = [
    MovementCategory::UpperPush,
    MovementCategory::UpperPull,
    MovementCategory::LowerPush,
    MovementCategory::LowerHinge,
    MovementCategory::Core,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      MovementCategory::UpperPush => "upper_push",
      MovementCategory::UpperPull => "upper_pull",
      MovementCategory::LowerPush => "lower_push",
      MovementCategory::LowerHinge => "lower_hinge",
      MovementCategory::Core => "core",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      MovementCategory::UpperPush => "Upper Push",
      MovementCategory::UpperPull => "Upper Pull",
      MovementCategory::LowerPush => "Lower Push",
      MovementCategory::LowerHinge => "Lower Hinge",
      MovementCategory::Core => "Core",
    }
  }
}

impl std::fmt::Display for MovementCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for MovementCategory {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|c| c.as_str() == s)
      .ok_or_else(|| format!("Unknown movement category: {}", s))
  }
}

/// ---------------------------------------------------------------------------
/// Exercise
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Exercise {
  pub id: ExerciseId,
  pub name: String,
  pub category: MovementCategory,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// For inserting new exercises (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExercise {
  pub name: String,
  pub category: MovementCategory,
  pub notes: Option<String>,
}

/// Partial edit; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseUpdate {
  pub name: Option<String>,
  pub category: Option<MovementCategory>,
  /// Blank text clears the notes
  pub notes: Option<String>,
}
