pub mod exercise;
pub mod workout;

pub use exercise::{Exercise, ExerciseId, ExerciseUpdate, MovementCategory, NewExercise};
pub use workout::{NewSet, NewWorkout, SetId, Workout, WorkoutId, WorkoutSet};
