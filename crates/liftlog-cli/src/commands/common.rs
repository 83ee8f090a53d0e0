use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use liftlog_core::auth::{AuthClient, FileSessionStore};
use liftlog_core::db::{CatalogRepository, LocalStore};
use liftlog_core::models::{ExerciseDraft, WeightUnit};
use liftlog_core::services::{week_start, ExerciseHistoryEntry, WeeklyVolume};
use liftlog_core::remote::HttpWorkoutRemote;
use liftlog_core::services::{WorkoutDetail, WorkoutService};
use liftlog_core::sync::{Connectivity, SyncEngine};
use liftlog_core::{LocalId, SyncStatus, Workout};
use serde::Serialize;

use crate::error::CliError;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const SHORT_ID_CHARS: usize = 13;

pub type CliAuthClient = AuthClient<FileSessionStore>;
pub type CliWorkoutService = WorkoutService<HttpWorkoutRemote, CliAuthClient>;

/// Everything a command needs, wired once per invocation.
pub struct AppContext {
    pub store: Arc<LocalStore>,
    pub service: CliWorkoutService,
    pub auth: CliAuthClient,
    pub connectivity: Connectivity,
}

pub async fn open_context() -> Result<AppContext, CliError> {
    let data_dir = resolve_data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let store = Arc::new(LocalStore::open(data_dir.join("liftlog.db")).await?);
    CatalogRepository::new(&store).seed_defaults().await?;

    let api_url = resolve_api_url();
    let auth = AuthClient::new(
        &api_url,
        FileSessionStore::new(data_dir.join("session.json")),
    )?;
    let remote =
        HttpWorkoutRemote::new(&api_url).map_err(|error| CliError::Api(error.to_string()))?;

    let connectivity = Connectivity::new(resolve_online());
    let engine = Arc::new(SyncEngine::new(
        Arc::clone(&store),
        remote,
        auth.clone(),
        connectivity.clone(),
    ));

    Ok(AppContext {
        service: WorkoutService::new(Arc::clone(&store), engine),
        store,
        auth,
        connectivity,
    })
}

pub fn resolve_data_dir() -> PathBuf {
    env::var_os("LIFTLOG_DATA_DIR").map_or_else(
        || {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("liftlog")
        },
        PathBuf::from,
    )
}

pub fn resolve_api_url() -> String {
    env::var("LIFTLOG_API_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Online when an API endpoint is configured and offline mode is not forced.
pub fn resolve_online() -> bool {
    if env::var_os("LIFTLOG_OFFLINE").is_some() {
        return false;
    }
    env::var("LIFTLOG_API_URL").is_ok_and(|url| !url.trim().is_empty())
}

pub fn parse_workout_date(raw: Option<&str>) -> Result<NaiveDate, CliError> {
    match raw {
        None => Ok(chrono::Local::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| CliError::InvalidDate(raw.to_string())),
    }
}

/// Parse one exercise argument: `NAME SETSxREPS [@WEIGHT]`.
pub fn parse_exercise_spec(spec: &str) -> Result<ExerciseDraft, CliError> {
    let invalid = || CliError::InvalidExerciseSpec(spec.to_string());

    let mut name_parts: Vec<&str> = Vec::new();
    let mut sets_reps: Option<(u32, u32)> = None;
    let mut weight: Option<f64> = None;

    for token in spec.split_whitespace() {
        if let Some(raw_weight) = token.strip_prefix('@') {
            if weight.is_some() {
                return Err(invalid());
            }
            weight = Some(raw_weight.parse::<f64>().map_err(|_| invalid())?);
        } else if sets_reps.is_none() && token.contains('x') {
            if let Some((sets, reps)) = parse_sets_reps(token) {
                sets_reps = Some((sets, reps));
                continue;
            }
            name_parts.push(token);
        } else {
            // Anything after SETSxREPS other than @WEIGHT is a mistake.
            if sets_reps.is_some() {
                return Err(invalid());
            }
            name_parts.push(token);
        }
    }

    let (sets, reps) = sets_reps.ok_or_else(invalid)?;
    if name_parts.is_empty() {
        return Err(invalid());
    }

    Ok(ExerciseDraft {
        name: name_parts.join(" "),
        sets,
        reps,
        weight,
        notes: None,
    })
}

fn parse_sets_reps(token: &str) -> Option<(u32, u32)> {
    let (sets, reps) = token.split_once('x')?;
    Some((sets.parse().ok()?, reps.parse().ok()?))
}

pub fn parse_weight_unit(raw: &str) -> Result<WeightUnit, CliError> {
    match raw.trim().to_lowercase().as_str() {
        "kg" => Ok(WeightUnit::Kg),
        "lb" | "lbs" => Ok(WeightUnit::Lb),
        _ => Err(CliError::InvalidSetting(format!(
            "unknown unit '{raw}', expected kg or lb"
        ))),
    }
}

pub fn parse_toggle(raw: &str) -> Result<bool, CliError> {
    match raw.trim().to_lowercase().as_str() {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        _ => Err(CliError::InvalidSetting(format!(
            "expected on or off, got '{raw}'"
        ))),
    }
}

pub fn normalize_workout_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyWorkoutId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Resolve a workout by exact local ID or unique ID prefix.
pub async fn resolve_workout(
    service: &CliWorkoutService,
    query: &str,
) -> Result<Workout, CliError> {
    if let Ok(local_id) = query.parse::<LocalId>() {
        if let Some(detail) = service.get(local_id).await? {
            return Ok(detail.workout);
        }
    }

    let matches: Vec<Workout> = service
        .list()
        .await?
        .into_iter()
        .filter(|workout| workout.local_id.as_str().starts_with(query))
        .collect();

    if matches.len() > 1 {
        let options = matches
            .iter()
            .take(3)
            .map(|workout| short_id(&workout.local_id))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(CliError::AmbiguousWorkoutId(format!(
            "ID prefix '{query}' is ambiguous; matches: {options}"
        )));
    }
    matches
        .into_iter()
        .next()
        .ok_or_else(|| CliError::WorkoutNotFound(query.to_string()))
}

#[derive(Debug, Serialize)]
pub struct WorkoutListItem {
    pub id: String,
    pub date: String,
    pub sync_status: String,
    pub notes: Option<String>,
    pub updated_at: i64,
}

#[derive(Debug, Serialize)]
pub struct ExerciseItem {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutDetailItem {
    #[serde(flatten)]
    pub workout: WorkoutListItem,
    pub exercises: Vec<ExerciseItem>,
}

#[derive(Debug, Serialize)]
pub struct WeeklyVolumeItem {
    pub week_start: String,
    pub volume: i64,
    pub change_percent: i64,
    pub workout_count: usize,
    pub total_reps: u64,
    pub weighted_volume: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub date: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

pub fn workout_to_list_item(workout: &Workout) -> WorkoutListItem {
    WorkoutListItem {
        id: workout.local_id.as_str(),
        date: workout.date.format("%Y-%m-%d").to_string(),
        sync_status: sync_status_label(workout.sync_status).to_string(),
        notes: workout.notes.clone(),
        updated_at: workout.updated_at,
    }
}

pub fn detail_to_item(detail: &WorkoutDetail) -> WorkoutDetailItem {
    WorkoutDetailItem {
        workout: workout_to_list_item(&detail.workout),
        exercises: detail
            .exercises
            .iter()
            .map(|exercise| ExerciseItem {
                name: exercise.name.clone(),
                sets: exercise.sets,
                reps: exercise.reps,
                weight: exercise.weight,
                notes: exercise.notes.clone(),
            })
            .collect(),
    }
}

pub fn format_workout_lines(workouts: &[Workout]) -> Vec<String> {
    workouts
        .iter()
        .map(|workout| {
            let id = short_id(&workout.local_id);
            let date = workout.date.format("%Y-%m-%d");
            let status = sync_status_label(workout.sync_status);
            match workout.notes.as_deref() {
                Some(notes) => format!("{id:<13}  {date}  {status:<7}  {notes}"),
                None => format!("{id:<13}  {date}  {status}"),
            }
        })
        .collect()
}

pub fn format_exercise_line(exercise: &ExerciseItem, unit: &str) -> String {
    let mut line = format!(
        "  {} {}x{}",
        exercise.name, exercise.sets, exercise.reps
    );
    if let Some(weight) = exercise.weight {
        line.push_str(&format!(" @{weight}{unit}"));
    }
    if let Some(notes) = &exercise.notes {
        line.push_str(&format!("  ({notes})"));
    }
    line
}

pub fn format_history_line(entry: &ExerciseHistoryEntry, unit: &str) -> String {
    let mut line = format!(
        "{}  {}x{}",
        entry.date.format("%Y-%m-%d"),
        entry.sets,
        entry.reps
    );
    if let Some(weight) = entry.weight {
        line.push_str(&format!(" @{weight}{unit}"));
    }
    if let Some(notes) = &entry.notes {
        line.push_str(&format!("  ({notes})"));
    }
    line
}

pub fn weekly_to_item(week: &WeeklyVolume) -> WeeklyVolumeItem {
    WeeklyVolumeItem {
        week_start: week.week_start.format("%Y-%m-%d").to_string(),
        volume: week.volume,
        change_percent: week.change_percent,
        workout_count: week.workout_count,
        total_reps: week.total_reps,
        weighted_volume: week.weighted_volume,
    }
}

pub fn history_to_item(entry: &ExerciseHistoryEntry) -> HistoryItem {
    HistoryItem {
        date: entry.date.format("%Y-%m-%d").to_string(),
        sets: entry.sets,
        reps: entry.reps,
        weight: entry.weight,
        notes: entry.notes.clone(),
    }
}

/// Relative label for a week, judged against the current week's Sunday.
pub fn week_label(start: NaiveDate, current_week: NaiveDate) -> String {
    if start == current_week {
        "This week".to_string()
    } else if current_week - start == chrono::Duration::days(7) {
        "Last week".to_string()
    } else {
        format!("Week of {}", start.format("%b %d"))
    }
}

pub fn format_week_line(week: &WeeklyVolume, current_week: NaiveDate) -> String {
    let label = week_label(week.week_start, current_week);
    let plural = if week.workout_count == 1 { "" } else { "s" };
    if week.change_percent == 0 {
        format!(
            "{label:<15}  volume {:>6}  {} workout{plural}",
            week.volume, week.workout_count
        )
    } else {
        format!(
            "{label:<15}  volume {:>6} ({:+}%)  {} workout{plural}",
            week.volume, week.change_percent, week.workout_count
        )
    }
}

pub fn current_week() -> NaiveDate {
    week_start(chrono::Local::now().date_naive())
}

pub fn short_id(id: &LocalId) -> String {
    id.as_str().chars().take(SHORT_ID_CHARS).collect()
}

pub const fn weight_unit_label(unit: WeightUnit) -> &'static str {
    match unit {
        WeightUnit::Kg => "kg",
        WeightUnit::Lb => "lb",
    }
}

pub const fn sync_status_label(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Pending => "pending",
        SyncStatus::Synced => "synced",
        SyncStatus::Failed => "failed",
    }
}
