//! Outbox entry model
//!
//! The outbox is a durable, ordered log of pending remote mutations. Each
//! entry carries the full snapshot needed to replay its mutation, so stale
//! entries are safe to re-send.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::workout::{Exercise, LocalId, Workout};

/// Retry bound for a single outbox entry. Beyond it the entry is parked:
/// kept in the queue for manual retry but excluded from automatic passes.
pub const MAX_RETRIES: u32 = 3;

/// Identifier for an outbox entry, using UUID v7 so the string form is
/// monotonic with enqueue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutboxEntryId(Uuid);

impl OutboxEntryId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for OutboxEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OutboxEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OutboxEntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The mutation recorded at enqueue time.
///
/// The action actually sent is re-derived at send time from the record's
/// current server identity, so a queued `Update` may be promoted to a
/// create and a queued `Create` may be demoted to an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboxAction {
    Create,
    Update,
    Delete,
}

/// Point-in-time snapshot of a workout, including its child exercises
/// and the server identity if one was known at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSnapshot {
    pub local_id: LocalId,
    pub server_id: Option<String>,
    pub date: chrono::NaiveDate,
    pub notes: Option<String>,
    pub exercises: Vec<Exercise>,
}

impl WorkoutSnapshot {
    /// Capture the replay data for a workout and its current children.
    #[must_use]
    pub fn capture(workout: &Workout, exercises: Vec<Exercise>) -> Self {
        Self {
            local_id: workout.local_id,
            server_id: workout.server_id.clone(),
            date: workout.date,
            notes: workout.notes.clone(),
            exercises,
        }
    }
}

/// Entry payload, tagged by entity type.
///
/// Stored entries whose entity type is not a known variant are left in the
/// queue untouched and skipped by the sync engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity_type", content = "data", rename_all = "lowercase")]
pub enum OutboxPayload {
    Workout(WorkoutSnapshot),
}

/// A pending remote mutation, durable until confirmed by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEntry {
    /// Monotonic local identifier; key order is enqueue order
    pub id: OutboxEntryId,
    /// Mutation kind recorded at enqueue time
    pub action: OutboxAction,
    /// The affected record's local ID
    pub entity_id: LocalId,
    /// Full replay snapshot
    pub payload: OutboxPayload,
    /// Enqueue timestamp (Unix ms)
    pub timestamp: i64,
    /// Consecutive failure count, saturating at [`MAX_RETRIES`]
    pub retry_count: u32,
}

impl OutboxEntry {
    /// Create an entry with a fresh ID and a zero retry count.
    #[must_use]
    pub fn new(action: OutboxAction, entity_id: LocalId, payload: OutboxPayload) -> Self {
        Self {
            id: OutboxEntryId::new(),
            action,
            entity_id,
            payload,
            timestamp: chrono::Utc::now().timestamp_millis(),
            retry_count: 0,
        }
    }

    /// Whether this entry exceeded the retry bound and is excluded from
    /// automatic passes.
    #[must_use]
    pub const fn is_parked(&self) -> bool {
        self.retry_count >= MAX_RETRIES
    }

    /// Record one more failed send attempt, saturating at the bound.
    pub fn record_failure(&mut self) {
        self.retry_count = self.retry_count.saturating_add(1).min(MAX_RETRIES);
    }
}
