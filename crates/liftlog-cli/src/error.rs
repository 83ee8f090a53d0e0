use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] liftlog_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Auth(#[from] liftlog_core::auth::AuthError),
    #[error("Invalid API configuration: {0}")]
    Api(String),
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid exercise '{0}': expected \"NAME SETSxREPS [@WEIGHT]\", e.g. \"Squat 3x5 @100\"")]
    InvalidExerciseSpec(String),
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
    #[error("Workout ID cannot be empty")]
    EmptyWorkoutId,
    #[error("Workout not found for id/prefix: {0}")]
    WorkoutNotFound(String),
    #[error("{0}")]
    AmbiguousWorkoutId(String),
}
