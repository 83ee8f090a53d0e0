//! Workout and exercise models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// A locally-generated identifier, assigned at creation time and never reused.
///
/// Uses UUID v7 (time-sortable), so lexicographic order of the string form
/// matches creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalId(Uuid);

impl LocalId {
    /// Create a new unique local ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for LocalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Sync status of a locally-stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    /// Local mutations not yet confirmed by the remote service
    Pending,
    /// Last outbox entry for this record completed with no mutations since
    Synced,
    /// Retry bound exceeded; still editable, eligible for manual retry
    Failed,
}

/// A workout record owned by the local store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Local primary key, immutable
    pub local_id: LocalId,
    /// Server-assigned identity, set exactly once after the first
    /// successful create sync
    pub server_id: Option<String>,
    /// Current sync status
    pub sync_status: SyncStatus,
    /// Workout date
    pub date: NaiveDate,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp (Unix ms, local clock)
    pub created_at: i64,
    /// Last update timestamp (Unix ms, local clock)
    pub updated_at: i64,
}

impl Workout {
    /// Create a new workout in `Pending` state with no server identity
    #[must_use]
    pub fn new(date: NaiveDate, notes: Option<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            local_id: LocalId::new(),
            server_id: None,
            sync_status: SyncStatus::Pending,
            date,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An exercise belonging to a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Local primary key, immutable
    pub local_id: LocalId,
    /// Server-assigned identity; only set as part of the parent's
    /// create response
    pub server_id: Option<String>,
    /// Foreign key to the parent workout's local ID
    pub workout_local_id: LocalId,
    /// Exercise name
    pub name: String,
    /// Number of sets
    pub sets: u32,
    /// Repetitions per set
    pub reps: u32,
    /// Optional weight (unit is a user setting)
    pub weight: Option<f64>,
    /// Free-form notes
    pub notes: Option<String>,
}

impl Exercise {
    /// Create an exercise for the given parent from validated draft data
    #[must_use]
    pub fn from_draft(workout_local_id: LocalId, draft: ExerciseDraft) -> Self {
        Self {
            local_id: LocalId::new(),
            server_id: None,
            workout_local_id,
            name: draft.name,
            sets: draft.sets,
            reps: draft.reps,
            weight: draft.weight,
            notes: draft.notes,
        }
    }
}

/// User input for a workout, validated before it reaches the store or outbox
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDraft {
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub exercises: Vec<ExerciseDraft>,
}

/// User input for a single exercise
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDraft {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

impl WorkoutDraft {
    /// Validate draft data before enqueueing.
    ///
    /// Malformed records are rejected here and never reach the outbox.
    pub fn validate(&self) -> Result<()> {
        for exercise in &self.exercises {
            exercise.validate()?;
        }
        Ok(())
    }
}

impl ExerciseDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInput(
                "exercise name cannot be empty".to_string(),
            ));
        }
        if self.sets == 0 {
            return Err(Error::InvalidInput(
                "exercise sets must be at least 1".to_string(),
            ));
        }
        if self.reps == 0 {
            return Err(Error::InvalidInput(
                "exercise reps must be at least 1".to_string(),
            ));
        }
        if let Some(weight) = self.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidInput(
                    "exercise weight must be a non-negative number".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_local_id_unique() {
        let id1 = LocalId::new();
        let id2 = LocalId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_local_id_parse() {
        let id = LocalId::new();
        let parsed: LocalId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_workout_new_starts_pending() {
        let workout = Workout::new(date(), Some("leg day".to_string()));
        assert_eq!(workout.sync_status, SyncStatus::Pending);
        assert!(workout.server_id.is_none());
        assert_eq!(workout.created_at, workout.updated_at);
    }

    #[test]
    fn test_sync_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SyncStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&SyncStatus::Synced).unwrap(),
            "\"synced\""
        );
    }

    #[test]
    fn test_draft_validation_rejects_empty_name() {
        let draft = ExerciseDraft {
            name: "   ".to_string(),
            sets: 3,
            reps: 5,
            weight: None,
            notes: None,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_draft_validation_rejects_zero_sets() {
        let draft = ExerciseDraft {
            name: "Squat".to_string(),
            sets: 0,
            reps: 5,
            weight: None,
            notes: None,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_draft_validation_rejects_negative_weight() {
        let draft = ExerciseDraft {
            name: "Squat".to_string(),
            sets: 3,
            reps: 5,
            weight: Some(-10.0),
            notes: None,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_draft_validation_accepts_valid() {
        let draft = WorkoutDraft {
            date: date(),
            notes: None,
            exercises: vec![ExerciseDraft {
                name: "Squat".to_string(),
                sets: 3,
                reps: 5,
                weight: Some(100.0),
                notes: None,
            }],
        };
        assert!(draft.validate().is_ok());
    }
}
