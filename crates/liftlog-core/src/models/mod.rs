//! Data models for liftlog

mod catalog;
mod outbox;
mod settings;
mod workout;

pub use catalog::{default_catalog, CatalogExercise};
pub use outbox::{
    OutboxAction, OutboxEntry, OutboxEntryId, OutboxPayload, WorkoutSnapshot, MAX_RETRIES,
};
pub use settings::{Settings, WeightUnit};
pub use workout::{Exercise, ExerciseDraft, LocalId, SyncStatus, Workout, WorkoutDraft};
