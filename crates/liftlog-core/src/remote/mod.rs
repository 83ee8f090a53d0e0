//! Remote workout API surface.
//!
//! The wire types strip local identity before anything leaves the device:
//! local IDs and sync bookkeeping never appear in a request body.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::WorkoutSnapshot;

mod http;

pub use http::HttpWorkoutRemote;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Resource not found")]
    NotFound,
    #[error("Invalid API configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Request body for creating or fully replacing a workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutBody {
    pub date: chrono::NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub exercises: Vec<ExerciseBody>,
}

/// A single exercise inside a workout body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseBody {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutBody {
    /// Build a request body from a queued snapshot. Identity fields are
    /// dropped; the server assigns its own IDs.
    #[must_use]
    pub fn from_snapshot(snapshot: &WorkoutSnapshot) -> Self {
        Self {
            date: snapshot.date,
            notes: snapshot.notes.clone(),
            exercises: snapshot
                .exercises
                .iter()
                .map(|exercise| ExerciseBody {
                    name: exercise.name.clone(),
                    sets: exercise.sets,
                    reps: exercise.reps,
                    weight: exercise.weight,
                    notes: exercise.notes.clone(),
                })
                .collect(),
        }
    }
}

/// Server response to a successful create.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateWorkoutResponse {
    pub id: String,
    #[serde(default)]
    pub exercises: Vec<CreatedExercise>,
}

/// A created child exercise, in request order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedExercise {
    pub id: String,
}

/// The remote mutation endpoints the sync engine needs.
///
/// Futures are `Send` so the engine can run inside spawned tasks.
pub trait WorkoutRemote: Send + Sync + 'static {
    fn create_workout(
        &self,
        access_token: &str,
        body: &WorkoutBody,
    ) -> impl Future<Output = ApiResult<CreateWorkoutResponse>> + Send;

    fn update_workout(
        &self,
        access_token: &str,
        server_id: &str,
        body: &WorkoutBody,
    ) -> impl Future<Output = ApiResult<()>> + Send;

    fn delete_workout(
        &self,
        access_token: &str,
        server_id: &str,
    ) -> impl Future<Output = ApiResult<()>> + Send;
}
