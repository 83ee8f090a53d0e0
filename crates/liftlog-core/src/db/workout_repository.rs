//! Workout repository: typed access to the workouts and exercises collections.

use crate::db::schema::{EXERCISES, WORKOUTS};
use crate::db::LocalStore;
use crate::error::Result;
use crate::models::{Exercise, LocalId, SyncStatus, Workout};

/// Typed operations over workout records and their child exercises.
pub struct WorkoutRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> WorkoutRepository<'a> {
    /// Create a new repository over the given store
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Upsert a workout record
    pub async fn save(&self, workout: &Workout) -> Result<()> {
        self.store
            .put(WORKOUTS, &workout.local_id.as_str(), workout)
            .await
    }

    /// Fetch a workout by local ID
    pub async fn get(&self, local_id: LocalId) -> Result<Option<Workout>> {
        self.store.get(WORKOUTS, &local_id.as_str()).await
    }

    /// List all workouts, newest date first
    pub async fn list(&self) -> Result<Vec<Workout>> {
        let mut workouts: Vec<Workout> = self.store.get_all(WORKOUTS).await?;
        workouts.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(workouts)
    }

    /// List workouts with a given sync status (index lookup)
    pub async fn by_status(&self, status: SyncStatus) -> Result<Vec<Workout>> {
        let value = serde_json::to_string(&status)?
            .trim_matches('"')
            .to_string();
        self.store
            .get_all_by_index(WORKOUTS, "sync_status", value)
            .await
    }

    /// Upsert a child exercise
    pub async fn save_exercise(&self, exercise: &Exercise) -> Result<()> {
        self.store
            .put(EXERCISES, &exercise.local_id.as_str(), exercise)
            .await
    }

    /// All child exercises of a workout, in creation order
    pub async fn exercises_for(&self, workout_local_id: LocalId) -> Result<Vec<Exercise>> {
        let mut exercises: Vec<Exercise> = self
            .store
            .get_all_by_index(EXERCISES, "workout_local_id", workout_local_id.as_str())
            .await?;
        // Local IDs are UUID v7, so string order is creation order.
        exercises.sort_by_key(|e| e.local_id.as_str());
        Ok(exercises)
    }

    /// Delete all child exercises of a workout.
    ///
    /// Each step is an idempotent single-key delete, so an interrupted run
    /// can simply be repeated.
    pub async fn delete_exercises_for(&self, workout_local_id: LocalId) -> Result<()> {
        let exercises = self.exercises_for(workout_local_id).await?;
        for exercise in exercises {
            self.store
                .delete(EXERCISES, &exercise.local_id.as_str())
                .await?;
        }
        Ok(())
    }

    /// Delete a workout record (children are the caller's responsibility;
    /// deleting an absent record is a no-op)
    pub async fn delete(&self, local_id: LocalId) -> Result<()> {
        self.store.delete(WORKOUTS, &local_id.as_str()).await
    }
}
