//! High-level services composing the store, outbox, and sync engine.

mod stats;
mod workouts;

pub use stats::{week_start, ExerciseHistoryEntry, StatsService, VolumeTotals, WeeklyVolume};
pub use workouts::{WorkoutDetail, WorkoutService};
