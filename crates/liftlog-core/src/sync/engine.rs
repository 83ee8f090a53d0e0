//! The sync engine: drains the outbox against the remote API.
//!
//! A pass walks queued entries in order, resolves each against current
//! identity, sends it, and removes it only on confirmed success. Passes are
//! mutually exclusive; triggers that arrive mid-pass are skipped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::auth::{AuthError, AuthProvider};
use crate::db::{LocalStore, OutboxRepository, SettingsRepository, WorkoutRepository};
use crate::error::Result;
use crate::models::{LocalId, OutboxEntry, OutboxPayload, SyncStatus, WorkoutSnapshot};
use crate::remote::{ApiError, ApiResult, CreateWorkoutResponse, WorkoutBody, WorkoutRemote};
use crate::sync::connectivity::Connectivity;
use crate::sync::identity::{self, ResolvedAction};
use crate::sync::status::SyncStatusHandle;
use crate::util::unix_timestamp_millis;

/// Cadence of the periodic background pass.
pub const AUTO_SYNC_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// What started a pass. Automatic passes skip parked entries; manual ones
/// include them, which is the recovery path after repeated failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    Automatic,
    Manual,
}

/// Summary of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// False when the pass was skipped (offline, or one already running).
    pub ran: bool,
    pub attempted: usize,
    pub succeeded: usize,
    /// Entries resolved as local no-ops and removed without a network call.
    pub dropped: usize,
    pub requeued: usize,
    /// Entries that hit the retry bound during this pass.
    pub parked: usize,
}

enum SendOutcome {
    Sent,
    Dropped,
    Retry,
}

enum RemoteCall<'a> {
    Create(&'a WorkoutBody),
    Update(&'a str, &'a WorkoutBody),
    Delete(&'a str),
}

pub struct SyncEngine<R: WorkoutRemote, A: AuthProvider> {
    store: Arc<LocalStore>,
    remote: R,
    auth: A,
    connectivity: Connectivity,
    status: Arc<SyncStatusHandle>,
    auto_sync_started: AtomicBool,
}

impl<R: WorkoutRemote, A: AuthProvider> SyncEngine<R, A> {
    pub fn new(store: Arc<LocalStore>, remote: R, auth: A, connectivity: Connectivity) -> Self {
        Self {
            store,
            remote,
            auth,
            connectivity,
            status: Arc::new(SyncStatusHandle::new()),
            auto_sync_started: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> Arc<SyncStatusHandle> {
        Arc::clone(&self.status)
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Run one sync pass. Returns a skipped report (`ran == false`) when
    /// offline, when automatic sync is disabled in settings, or when another
    /// pass holds the lock. Manual passes ignore the settings switch.
    pub async fn sync(&self, trigger: SyncTrigger) -> Result<SyncReport> {
        if !self.connectivity.is_online() {
            tracing::debug!("Skipping sync pass while offline");
            return Ok(SyncReport::default());
        }
        if trigger == SyncTrigger::Automatic {
            let settings = SettingsRepository::new(&self.store).load().await?;
            if !settings.auto_sync_enabled {
                tracing::debug!("Automatic sync disabled in settings, skipping pass");
                return Ok(SyncReport::default());
            }
        }
        if !self.status.try_begin() {
            tracing::debug!("Sync pass already running, skipping trigger");
            return Ok(SyncReport::default());
        }

        let result = self.run_pass(trigger).await;
        self.status.end();

        let report = result?;
        if report.attempted > 0 {
            self.status.set_last_sync_time(unix_timestamp_millis());
        }
        Ok(report)
    }

    /// Start the background auto-sync task: one immediate pass, a pass on
    /// every offline-to-online transition, and a periodic pass. Returns false
    /// if the task was already started.
    pub fn spawn_auto_sync(self: &Arc<Self>) -> bool {
        if self.auto_sync_started.swap(true, Ordering::AcqRel) {
            return false;
        }

        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let mut online_edges = engine.connectivity.subscribe();
            let mut ticker = tokio::time::interval(AUTO_SYNC_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        engine.run_auto_pass().await;
                    }
                    changed = online_edges.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if *online_edges.borrow_and_update() {
                            engine.run_auto_pass().await;
                        }
                    }
                }
            }
        });
        true
    }

    async fn run_auto_pass(&self) {
        if let Err(error) = self.sync(SyncTrigger::Automatic).await {
            tracing::error!("Automatic sync pass failed: {}", error);
        }
    }

    async fn run_pass(&self, trigger: SyncTrigger) -> Result<SyncReport> {
        let outbox = OutboxRepository::new(&self.store);
        let entries = outbox.all_ordered().await?;

        let mut report = SyncReport {
            ran: true,
            ..SyncReport::default()
        };

        for mut entry in entries {
            if trigger == SyncTrigger::Automatic && entry.is_parked() {
                continue;
            }
            report.attempted += 1;

            match self.send_entry(&entry).await? {
                SendOutcome::Sent => {
                    outbox.remove(entry.id).await?;
                    report.succeeded += 1;
                }
                SendOutcome::Dropped => {
                    outbox.remove(entry.id).await?;
                    report.dropped += 1;
                }
                SendOutcome::Retry => {
                    entry.record_failure();
                    outbox.requeue(&entry).await?;
                    report.requeued += 1;
                    if entry.is_parked() {
                        report.parked += 1;
                        self.mark_failed(entry.entity_id).await?;
                        tracing::warn!(
                            "Outbox entry {} parked after {} failed attempts; run a manual sync to retry",
                            entry.id,
                            entry.retry_count
                        );
                    }
                }
            }
        }

        if report.attempted > 0 {
            tracing::info!(
                "Sync pass finished: {} sent, {} requeued, {} dropped",
                report.succeeded,
                report.requeued,
                report.dropped
            );
        }
        Ok(report)
    }

    /// Resolve and send one entry. `Retry` covers every remote-side failure;
    /// local storage errors propagate and abort the pass.
    async fn send_entry(&self, entry: &OutboxEntry) -> Result<SendOutcome> {
        let OutboxPayload::Workout(snapshot) = &entry.payload;
        let workouts = WorkoutRepository::new(&self.store);
        let current = workouts.get(entry.entity_id).await?;
        let resolved = identity::resolve(entry.action, snapshot.server_id.as_deref(), current.as_ref());

        let outcome = match resolved {
            ResolvedAction::Drop => SendOutcome::Dropped,
            ResolvedAction::Create => {
                let body = WorkoutBody::from_snapshot(snapshot);
                match self.call_with_auth(RemoteCall::Create(&body)).await {
                    Ok(Some(response)) => {
                        self.apply_create(&workouts, snapshot, &response).await?;
                        SendOutcome::Sent
                    }
                    Ok(None) => SendOutcome::Sent,
                    Err(error) => {
                        tracing::warn!("Create for {} failed: {}", entry.entity_id, error);
                        SendOutcome::Retry
                    }
                }
            }
            ResolvedAction::Update(server_id) => {
                let body = WorkoutBody::from_snapshot(snapshot);
                match self.call_with_auth(RemoteCall::Update(&server_id, &body)).await {
                    Ok(_) => {
                        self.mark_synced(&workouts, entry.entity_id).await?;
                        SendOutcome::Sent
                    }
                    Err(error) => {
                        tracing::warn!("Update for {} failed: {}", entry.entity_id, error);
                        SendOutcome::Retry
                    }
                }
            }
            ResolvedAction::Delete(server_id) => {
                match self.call_with_auth(RemoteCall::Delete(&server_id)).await {
                    Ok(_) => SendOutcome::Sent,
                    Err(error) => {
                        tracing::warn!("Delete of {} failed: {}", server_id, error);
                        SendOutcome::Retry
                    }
                }
            }
        };
        Ok(outcome)
    }

    /// Send with the current token, refreshing once on a 401. The second
    /// rejection is a real failure.
    async fn call_with_auth(&self, call: RemoteCall<'_>) -> ApiResult<Option<CreateWorkoutResponse>> {
        let token = self.auth.access_token().await.map_err(auth_to_api)?;
        match self.dispatch(&token, &call).await {
            Err(ApiError::Unauthorized) => {
                let token = self.auth.refresh_access_token().await.map_err(auth_to_api)?;
                self.dispatch(&token, &call).await
            }
            other => other,
        }
    }

    async fn dispatch(
        &self,
        token: &str,
        call: &RemoteCall<'_>,
    ) -> ApiResult<Option<CreateWorkoutResponse>> {
        match call {
            RemoteCall::Create(body) => {
                Ok(Some(self.remote.create_workout(token, body).await?))
            }
            RemoteCall::Update(server_id, body) => {
                self.remote.update_workout(token, server_id, body).await?;
                Ok(None)
            }
            RemoteCall::Delete(server_id) => {
                match self.remote.delete_workout(token, server_id).await {
                    // Already gone remotely, which is what the entry wanted.
                    Ok(()) | Err(ApiError::NotFound) => Ok(None),
                    Err(error) => Err(error),
                }
            }
        }
    }

    /// Fold a create response back into the local records: the workout gains
    /// its server identity (exactly once) and children are matched to created
    /// IDs by request position.
    async fn apply_create(
        &self,
        workouts: &WorkoutRepository<'_>,
        snapshot: &WorkoutSnapshot,
        response: &CreateWorkoutResponse,
    ) -> Result<()> {
        let Some(mut workout) = workouts.get(snapshot.local_id).await? else {
            return Ok(());
        };
        if workout.server_id.is_none() {
            workout.server_id = Some(response.id.clone());
        }
        workout.sync_status = SyncStatus::Synced;
        workouts.save(&workout).await?;

        let live = workouts.exercises_for(snapshot.local_id).await?;
        for (snap_exercise, created) in snapshot.exercises.iter().zip(&response.exercises) {
            let found = live
                .iter()
                .find(|exercise| exercise.local_id == snap_exercise.local_id);
            if let Some(exercise) = found {
                if exercise.server_id.is_none() {
                    let mut exercise = exercise.clone();
                    exercise.server_id = Some(created.id.clone());
                    workouts.save_exercise(&exercise).await?;
                }
            }
        }
        Ok(())
    }

    async fn mark_synced(&self, workouts: &WorkoutRepository<'_>, local_id: LocalId) -> Result<()> {
        if let Some(mut workout) = workouts.get(local_id).await? {
            workout.sync_status = SyncStatus::Synced;
            workouts.save(&workout).await?;
        }
        Ok(())
    }

    async fn mark_failed(&self, local_id: LocalId) -> Result<()> {
        let workouts = WorkoutRepository::new(&self.store);
        if let Some(mut workout) = workouts.get(local_id).await? {
            workout.sync_status = SyncStatus::Failed;
            workouts.save(&workout).await?;
        }
        Ok(())
    }
}

fn auth_to_api(error: AuthError) -> ApiError {
    ApiError::Api(format!("auth: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthResult;
    use crate::models::{
        Exercise, ExerciseDraft, OutboxAction, Settings, Workout, WorkoutSnapshot, MAX_RETRIES,
    };
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    const VALID_TOKEN: &str = "token-1";

    #[derive(Default)]
    struct RemoteState {
        calls: Mutex<Vec<String>>,
        fail_next: AtomicUsize,
        next_id: AtomicUsize,
        missing: Mutex<Vec<String>>,
        last_update: Mutex<Option<WorkoutBody>>,
    }

    #[derive(Clone, Default)]
    struct FakeRemote {
        state: Arc<RemoteState>,
    }

    impl FakeRemote {
        fn calls(&self) -> Vec<String> {
            self.state.calls.lock().unwrap().clone()
        }

        fn fail_next(&self, count: usize) {
            self.state.fail_next.store(count, Ordering::SeqCst);
        }

        fn mark_missing(&self, server_id: &str) {
            self.state.missing.lock().unwrap().push(server_id.to_string());
        }

        fn last_update_body(&self) -> Option<WorkoutBody> {
            self.state.last_update.lock().unwrap().clone()
        }

        fn check(&self, token: &str) -> ApiResult<()> {
            if token != VALID_TOKEN {
                return Err(ApiError::Unauthorized);
            }
            let pending = self.state.fail_next.load(Ordering::SeqCst);
            if pending > 0 {
                self.state.fail_next.store(pending - 1, Ordering::SeqCst);
                return Err(ApiError::Api("server exploded (500)".to_string()));
            }
            Ok(())
        }
    }

    impl WorkoutRemote for FakeRemote {
        async fn create_workout(
            &self,
            access_token: &str,
            body: &WorkoutBody,
        ) -> ApiResult<CreateWorkoutResponse> {
            self.check(access_token)?;
            let n = self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.state.calls.lock().unwrap().push("create".to_string());
            Ok(CreateWorkoutResponse {
                id: format!("srv-{n}"),
                exercises: (0..body.exercises.len())
                    .map(|i| crate::remote::CreatedExercise {
                        id: format!("srv-{n}-ex-{i}"),
                    })
                    .collect(),
            })
        }

        async fn update_workout(
            &self,
            access_token: &str,
            server_id: &str,
            body: &WorkoutBody,
        ) -> ApiResult<()> {
            self.check(access_token)?;
            self.state
                .calls
                .lock()
                .unwrap()
                .push(format!("update {server_id}"));
            *self.state.last_update.lock().unwrap() = Some(body.clone());
            Ok(())
        }

        async fn delete_workout(&self, access_token: &str, server_id: &str) -> ApiResult<()> {
            self.check(access_token)?;
            self.state
                .calls
                .lock()
                .unwrap()
                .push(format!("delete {server_id}"));
            if self.state.missing.lock().unwrap().contains(&server_id.to_string()) {
                return Err(ApiError::NotFound);
            }
            Ok(())
        }
    }

    #[derive(Clone)]
    struct FakeAuth {
        token: Arc<Mutex<String>>,
        refreshes: Arc<AtomicUsize>,
    }

    impl FakeAuth {
        fn valid() -> Self {
            Self::with_token(VALID_TOKEN)
        }

        fn with_token(token: &str) -> Self {
            Self {
                token: Arc::new(Mutex::new(token.to_string())),
                refreshes: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn refresh_count(&self) -> usize {
            self.refreshes.load(Ordering::SeqCst)
        }
    }

    impl AuthProvider for FakeAuth {
        async fn access_token(&self) -> AuthResult<String> {
            Ok(self.token.lock().unwrap().clone())
        }

        async fn refresh_access_token(&self) -> AuthResult<String> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            let mut token = self.token.lock().unwrap();
            *token = VALID_TOKEN.to_string();
            Ok(token.clone())
        }
    }

    struct Fixture {
        engine: Arc<SyncEngine<FakeRemote, FakeAuth>>,
        store: Arc<LocalStore>,
        remote: FakeRemote,
    }

    async fn fixture() -> Fixture {
        fixture_with_auth(FakeAuth::valid()).await
    }

    async fn fixture_with_auth(auth: FakeAuth) -> Fixture {
        let store = Arc::new(LocalStore::open_in_memory().await.unwrap());
        let remote = FakeRemote::default();
        let engine = Arc::new(SyncEngine::new(
            Arc::clone(&store),
            remote.clone(),
            auth,
            Connectivity::new(true),
        ));
        Fixture {
            engine,
            store,
            remote,
        }
    }

    async fn seed_workout(store: &LocalStore, exercise_names: &[&str]) -> (Workout, Vec<Exercise>) {
        let workouts = WorkoutRepository::new(store);
        let workout = Workout::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), None);
        workouts.save(&workout).await.unwrap();

        let mut exercises = Vec::new();
        for name in exercise_names {
            let exercise = Exercise::from_draft(
                workout.local_id,
                ExerciseDraft {
                    name: (*name).to_string(),
                    sets: 3,
                    reps: 5,
                    weight: None,
                    notes: None,
                },
            );
            workouts.save_exercise(&exercise).await.unwrap();
            exercises.push(exercise);
        }
        (workout, exercises)
    }

    async fn enqueue(
        store: &LocalStore,
        action: OutboxAction,
        workout: &Workout,
        exercises: Vec<Exercise>,
    ) -> OutboxEntry {
        let entry = OutboxEntry::new(
            action,
            workout.local_id,
            OutboxPayload::Workout(WorkoutSnapshot::capture(workout, exercises)),
        );
        OutboxRepository::new(store).enqueue(&entry).await.unwrap();
        entry
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_assigns_server_identity() {
        let f = fixture().await;
        let (workout, exercises) = seed_workout(&f.store, &["Squat", "Bench Press"]).await;
        enqueue(&f.store, OutboxAction::Create, &workout, exercises).await;

        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert!(report.ran);
        assert_eq!(report.succeeded, 1);

        let workouts = WorkoutRepository::new(&f.store);
        let synced = workouts.get(workout.local_id).await.unwrap().unwrap();
        assert_eq!(synced.server_id.as_deref(), Some("srv-1"));
        assert_eq!(synced.sync_status, SyncStatus::Synced);

        let children = workouts.exercises_for(workout.local_id).await.unwrap();
        assert_eq!(children[0].server_id.as_deref(), Some("srv-1-ex-0"));
        assert_eq!(children[1].server_id.as_deref(), Some("srv-1-ex-1"));

        assert!(OutboxRepository::new(&f.store).is_empty().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_of_unsynced_record_sends_create() {
        let f = fixture().await;
        let (workout, _) = seed_workout(&f.store, &[]).await;
        enqueue(&f.store, OutboxAction::Update, &workout, Vec::new()).await;

        f.engine.sync(SyncTrigger::Manual).await.unwrap();

        assert_eq!(f.remote.calls(), vec!["create"]);
        let stored = WorkoutRepository::new(&f.store)
            .get(workout.local_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.server_id.as_deref(), Some("srv-1"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_later_entry_sees_identity_from_earlier_create() {
        let f = fixture().await;
        let (workout, _) = seed_workout(&f.store, &[]).await;
        // Both entries captured before any sync, so neither snapshot has a
        // server ID.
        enqueue(&f.store, OutboxAction::Create, &workout, Vec::new()).await;
        enqueue(&f.store, OutboxAction::Update, &workout, Vec::new()).await;

        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert_eq!(report.succeeded, 2);
        assert_eq!(f.remote.calls(), vec!["create", "update srv-1"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_second_update_to_same_record_wins() {
        let f = fixture().await;
        let workouts = WorkoutRepository::new(&f.store);
        let (mut workout, _) = seed_workout(&f.store, &[]).await;
        enqueue(&f.store, OutboxAction::Create, &workout, Vec::new()).await;

        workout.notes = Some("first edit".to_string());
        workouts.save(&workout).await.unwrap();
        enqueue(&f.store, OutboxAction::Update, &workout, Vec::new()).await;

        workout.notes = Some("second edit".to_string());
        workouts.save(&workout).await.unwrap();
        enqueue(&f.store, OutboxAction::Update, &workout, Vec::new()).await;

        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert_eq!(report.succeeded, 3);
        assert_eq!(
            f.remote.calls(),
            vec!["create", "update srv-1", "update srv-1"]
        );

        // The remote's final state carries the latest snapshot.
        let last = f.remote.last_update_body().unwrap();
        assert_eq!(last.notes.as_deref(), Some("second edit"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_disabled_auto_sync_skips_automatic_passes_only() {
        let f = fixture().await;
        SettingsRepository::new(&f.store)
            .save(&Settings {
                auto_sync_enabled: false,
                ..Settings::default()
            })
            .await
            .unwrap();
        let (workout, _) = seed_workout(&f.store, &[]).await;
        enqueue(&f.store, OutboxAction::Create, &workout, Vec::new()).await;

        let report = f.engine.sync(SyncTrigger::Automatic).await.unwrap();
        assert!(!report.ran);
        assert!(f.remote.calls().is_empty());

        // The switch only gates automatic passes.
        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(f.remote.calls(), vec!["create"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failures_requeue_then_park() {
        let f = fixture().await;
        let (workout, _) = seed_workout(&f.store, &[]).await;
        enqueue(&f.store, OutboxAction::Create, &workout, Vec::new()).await;
        f.remote.fail_next(usize::MAX);

        for expected_retries in 1..=MAX_RETRIES {
            let report = f.engine.sync(SyncTrigger::Automatic).await.unwrap();
            assert_eq!(report.requeued, 1);
            let entries = OutboxRepository::new(&f.store).all_ordered().await.unwrap();
            assert_eq!(entries[0].retry_count, expected_retries);
        }

        // Parked now; automatic passes no longer touch it.
        let report = f.engine.sync(SyncTrigger::Automatic).await.unwrap();
        assert_eq!(report.attempted, 0);

        // The record is flagged so the failure is visible.
        let stored = WorkoutRepository::new(&f.store)
            .get(workout.local_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.sync_status, SyncStatus::Failed);

        // Manual retry includes the parked entry and can still succeed.
        f.remote.fail_next(0);
        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert_eq!(report.succeeded, 1);
        assert!(OutboxRepository::new(&f.store).is_empty().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_offline_pass_is_skipped() {
        let f = fixture().await;
        let (workout, _) = seed_workout(&f.store, &[]).await;
        enqueue(&f.store, OutboxAction::Create, &workout, Vec::new()).await;

        f.engine.connectivity().set_online(false);
        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert!(!report.ran);
        assert!(f.remote.calls().is_empty());
        assert_eq!(OutboxRepository::new(&f.store).len().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_trigger_during_running_pass_is_skipped() {
        let f = fixture().await;
        let status = f.engine.status();
        assert!(status.try_begin());

        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert!(!report.ran);
        status.end();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_against_missing_remote_record_succeeds() {
        let f = fixture().await;
        let (mut workout, _) = seed_workout(&f.store, &[]).await;
        workout.server_id = Some("srv-gone".to_string());
        let snapshot_source = workout.clone();

        // Deleted locally already; only the queue entry remains.
        WorkoutRepository::new(&f.store)
            .delete(workout.local_id)
            .await
            .unwrap();
        enqueue(&f.store, OutboxAction::Delete, &snapshot_source, Vec::new()).await;
        f.remote.mark_missing("srv-gone");

        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert_eq!(report.succeeded, 1);
        assert!(OutboxRepository::new(&f.store).is_empty().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_entry_for_locally_deleted_record_is_dropped() {
        let f = fixture().await;
        let (workout, _) = seed_workout(&f.store, &[]).await;
        enqueue(&f.store, OutboxAction::Update, &workout, Vec::new()).await;
        WorkoutRepository::new(&f.store)
            .delete(workout.local_id)
            .await
            .unwrap();

        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert_eq!(report.dropped, 1);
        assert!(f.remote.calls().is_empty());
        assert!(OutboxRepository::new(&f.store).is_empty().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stale_token_refreshes_once_and_retries() {
        let auth = FakeAuth::with_token("stale");
        let f = fixture_with_auth(auth.clone()).await;
        let (workout, _) = seed_workout(&f.store, &[]).await;
        enqueue(&f.store, OutboxAction::Create, &workout, Vec::new()).await;

        let report = f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(auth.refresh_count(), 1);
        assert_eq!(f.remote.calls(), vec!["create"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_last_sync_time_set_only_when_entries_processed() {
        let f = fixture().await;
        let status = f.engine.status();

        f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert_eq!(status.last_sync_time(), None);

        let (workout, _) = seed_workout(&f.store, &[]).await;
        enqueue(&f.store, OutboxAction::Create, &workout, Vec::new()).await;
        f.engine.sync(SyncTrigger::Manual).await.unwrap();
        assert!(status.last_sync_time().is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_spawn_auto_sync_runs_initial_pass() {
        let f = fixture().await;
        let (workout, _) = seed_workout(&f.store, &[]).await;
        enqueue(&f.store, OutboxAction::Create, &workout, Vec::new()).await;

        assert!(f.engine.spawn_auto_sync());
        // Second call is a no-op.
        assert!(!f.engine.spawn_auto_sync());

        // The interval's first tick fires immediately.
        for _ in 0..50 {
            if OutboxRepository::new(&f.store).is_empty().await.unwrap() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(OutboxRepository::new(&f.store).is_empty().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_auto_sync_fires_on_reconnect() {
        let store = Arc::new(LocalStore::open_in_memory().await.unwrap());
        let remote = FakeRemote::default();
        let connectivity = Connectivity::new(false);
        let engine = Arc::new(SyncEngine::new(
            Arc::clone(&store),
            remote.clone(),
            FakeAuth::valid(),
            connectivity.clone(),
        ));

        let (workout, _) = seed_workout(&store, &[]).await;
        enqueue(&store, OutboxAction::Create, &workout, Vec::new()).await;

        engine.spawn_auto_sync();
        tokio::time::sleep(Duration::from_millis(50)).await;
        // Still offline, nothing sent.
        assert!(remote.calls().is_empty());

        connectivity.set_online(true);
        for _ in 0..50 {
            if OutboxRepository::new(&store).is_empty().await.unwrap() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(remote.calls(), vec!["create"]);
    }
}
