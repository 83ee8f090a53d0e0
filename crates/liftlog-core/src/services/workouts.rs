//! Workout service: the local-first mutation surface.
//!
//! Every mutation commits to the local store and appends an outbox entry in
//! the same call, then nudges the sync engine in the background. Callers get
//! an immediate answer whether the device is online or not.

use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::db::{LocalStore, OutboxRepository, WorkoutRepository};
use crate::error::{Error, Result};
use crate::models::{
    Exercise, LocalId, OutboxAction, OutboxEntry, OutboxPayload, SyncStatus, Workout,
    WorkoutDraft, WorkoutSnapshot,
};
use crate::remote::WorkoutRemote;
use crate::sync::{SyncEngine, SyncReport, SyncTrigger};
use crate::util::{normalize_text_option, unix_timestamp_millis};

/// A workout together with its child exercises.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutDetail {
    pub workout: Workout,
    pub exercises: Vec<Exercise>,
}

pub struct WorkoutService<R: WorkoutRemote, A: AuthProvider> {
    store: Arc<LocalStore>,
    engine: Arc<SyncEngine<R, A>>,
}

impl<R: WorkoutRemote, A: AuthProvider> WorkoutService<R, A> {
    pub fn new(store: Arc<LocalStore>, engine: Arc<SyncEngine<R, A>>) -> Self {
        Self { store, engine }
    }

    pub fn engine(&self) -> &Arc<SyncEngine<R, A>> {
        &self.engine
    }

    /// Create a workout locally and queue it for sync.
    pub async fn create_workout(&self, draft: WorkoutDraft) -> Result<Workout> {
        draft.validate()?;

        let workouts = WorkoutRepository::new(&self.store);
        let workout = Workout::new(draft.date, normalize_text_option(draft.notes));
        workouts.save(&workout).await?;

        let mut exercises = Vec::with_capacity(draft.exercises.len());
        for exercise_draft in draft.exercises {
            let exercise = Exercise::from_draft(workout.local_id, exercise_draft);
            workouts.save_exercise(&exercise).await?;
            exercises.push(exercise);
        }

        self.enqueue(OutboxAction::Create, &workout, exercises)
            .await?;
        self.nudge_sync();
        Ok(workout)
    }

    /// Replace a workout's data and children with the draft, mark it pending,
    /// and queue the update.
    pub async fn update_workout(&self, local_id: LocalId, draft: WorkoutDraft) -> Result<Workout> {
        draft.validate()?;

        let workouts = WorkoutRepository::new(&self.store);
        let mut workout = workouts
            .get(local_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("workout {local_id}")))?;

        workout.date = draft.date;
        workout.notes = normalize_text_option(draft.notes);
        workout.sync_status = SyncStatus::Pending;
        workout.updated_at = unix_timestamp_millis();
        workouts.save(&workout).await?;

        workouts.delete_exercises_for(local_id).await?;
        let mut exercises = Vec::with_capacity(draft.exercises.len());
        for exercise_draft in draft.exercises {
            let exercise = Exercise::from_draft(local_id, exercise_draft);
            workouts.save_exercise(&exercise).await?;
            exercises.push(exercise);
        }

        self.enqueue(OutboxAction::Update, &workout, exercises)
            .await?;
        self.nudge_sync();
        Ok(workout)
    }

    /// Delete a workout locally. The remote delete is only queued when the
    /// record ever reached the server; a local-only record just disappears.
    /// Deleting an absent record is a no-op.
    pub async fn delete_workout(&self, local_id: LocalId) -> Result<()> {
        let workouts = WorkoutRepository::new(&self.store);
        let Some(workout) = workouts.get(local_id).await? else {
            return Ok(());
        };

        // Snapshot before the record goes away; the entry is all the sync
        // pass will have.
        let exercises = workouts.exercises_for(local_id).await?;
        let snapshot_exercises = exercises.clone();

        workouts.delete_exercises_for(local_id).await?;
        workouts.delete(local_id).await?;

        if workout.server_id.is_some() {
            self.enqueue(OutboxAction::Delete, &workout, snapshot_exercises)
                .await?;
            self.nudge_sync();
        }
        Ok(())
    }

    pub async fn get(&self, local_id: LocalId) -> Result<Option<WorkoutDetail>> {
        let workouts = WorkoutRepository::new(&self.store);
        let Some(workout) = workouts.get(local_id).await? else {
            return Ok(None);
        };
        let exercises = workouts.exercises_for(local_id).await?;
        Ok(Some(WorkoutDetail { workout, exercises }))
    }

    pub async fn list(&self) -> Result<Vec<Workout>> {
        WorkoutRepository::new(&self.store).list().await
    }

    /// Workouts whose sync hit the retry bound and need a manual retry.
    pub async fn attention_needed(&self) -> Result<Vec<Workout>> {
        WorkoutRepository::new(&self.store)
            .by_status(SyncStatus::Failed)
            .await
    }

    /// Number of queued mutations, parked ones included.
    pub async fn pending_mutations(&self) -> Result<usize> {
        OutboxRepository::new(&self.store).len().await
    }

    /// Run a manual sync pass, parked entries included.
    pub async fn sync_now(&self) -> Result<SyncReport> {
        self.engine.sync(SyncTrigger::Manual).await
    }

    async fn enqueue(
        &self,
        action: OutboxAction,
        workout: &Workout,
        exercises: Vec<Exercise>,
    ) -> Result<()> {
        let entry = OutboxEntry::new(
            action,
            workout.local_id,
            OutboxPayload::Workout(WorkoutSnapshot::capture(workout, exercises)),
        );
        OutboxRepository::new(&self.store).enqueue(&entry).await
    }

    /// Kick off a background pass. The mutation that triggered it has already
    /// committed, so this never blocks or fails the caller.
    fn nudge_sync(&self) {
        if !self.engine.connectivity().is_online() {
            return;
        }
        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            if let Err(error) = engine.sync(SyncTrigger::Automatic).await {
                tracing::error!("Post-mutation sync failed: {}", error);
            }
        });
    }
}
