//! Training statistics derived from the local store.
//!
//! Everything here reads local data only, so stats work offline and include
//! workouts that have not synced yet. Volume follows the usual convention:
//! sets times reps, weighted by load where one was recorded.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::db::{LocalStore, WorkoutRepository};
use crate::error::Result;
use crate::models::LocalId;

/// One past occurrence of an exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseHistoryEntry {
    pub date: NaiveDate,
    pub sets: u32,
    pub reps: u32,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// Volume totals for one workout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VolumeTotals {
    /// Sum of sets * reps * weight over exercises with a recorded load
    pub weighted_volume: f64,
    /// Sum of sets * reps over all exercises
    pub total_reps: u64,
}

/// Aggregated volume for one calendar week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyVolume {
    /// The Sunday starting the week
    pub week_start: NaiveDate,
    /// Combined metric: total reps plus weighted volume, rounded. Reps keep
    /// the number meaningful for bodyweight-only weeks.
    pub volume: i64,
    /// Rounded percent change against the previous listed week
    pub change_percent: i64,
    pub workout_count: usize,
    pub total_reps: u64,
    pub weighted_volume: f64,
}

/// Read-only statistics over workouts and exercises.
pub struct StatsService<'a> {
    store: &'a LocalStore,
}

impl<'a> StatsService<'a> {
    /// Create a new service over the given store
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Every logged occurrence of an exercise by name (case-insensitive),
    /// newest workout first.
    pub async fn exercise_history(&self, name: &str) -> Result<Vec<ExerciseHistoryEntry>> {
        let workouts = WorkoutRepository::new(self.store);
        let needle = name.trim().to_lowercase();

        let mut history = Vec::new();
        for workout in workouts.list().await? {
            for exercise in workouts.exercises_for(workout.local_id).await? {
                if exercise.name.to_lowercase() == needle {
                    history.push(ExerciseHistoryEntry {
                        date: workout.date,
                        sets: exercise.sets,
                        reps: exercise.reps,
                        weight: exercise.weight,
                        notes: exercise.notes,
                    });
                }
            }
        }
        Ok(history)
    }

    /// The heaviest recorded occurrence of an exercise, if any.
    pub async fn personal_record(&self, name: &str) -> Result<Option<ExerciseHistoryEntry>> {
        let history = self.exercise_history(name).await?;
        Ok(history.into_iter().reduce(|best, entry| {
            if entry.weight.unwrap_or(0.0) > best.weight.unwrap_or(0.0) {
                entry
            } else {
                best
            }
        }))
    }

    /// Volume totals for one workout.
    pub async fn workout_volume(&self, local_id: LocalId) -> Result<VolumeTotals> {
        let workouts = WorkoutRepository::new(self.store);
        let mut totals = VolumeTotals::default();
        for exercise in workouts.exercises_for(local_id).await? {
            let reps = u64::from(exercise.sets) * u64::from(exercise.reps);
            totals.total_reps += reps;
            if let Some(weight) = exercise.weight {
                totals.weighted_volume += reps as f64 * weight;
            }
        }
        Ok(totals)
    }

    /// Per-week volume for the most recent `weeks_count` weeks that contain
    /// workouts, oldest first.
    pub async fn weekly_volume(&self, weeks_count: usize) -> Result<Vec<WeeklyVolume>> {
        let workouts = WorkoutRepository::new(self.store);

        let mut weeks: BTreeMap<NaiveDate, (VolumeTotals, usize)> = BTreeMap::new();
        for workout in workouts.list().await? {
            let totals = self.workout_volume(workout.local_id).await?;
            let entry = weeks.entry(week_start(workout.date)).or_default();
            entry.0.total_reps += totals.total_reps;
            entry.0.weighted_volume += totals.weighted_volume;
            entry.1 += 1;
        }

        let mut recent: Vec<_> = weeks.into_iter().collect();
        if recent.len() > weeks_count {
            recent.drain(..recent.len() - weeks_count);
        }

        let mut result = Vec::with_capacity(recent.len());
        let mut previous: Option<f64> = None;
        for (start, (totals, workout_count)) in recent {
            let combined = totals.total_reps as f64 + totals.weighted_volume;
            let change = match previous {
                Some(prev) if prev > 0.0 => ((combined - prev) / prev * 100.0).round() as i64,
                _ => 0,
            };
            previous = Some(combined);
            result.push(WeeklyVolume {
                week_start: start,
                volume: combined.round() as i64,
                change_percent: change,
                workout_count,
                total_reps: totals.total_reps,
                weighted_volume: totals.weighted_volume,
            });
        }
        Ok(result)
    }
}

/// The Sunday starting the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Exercise, ExerciseDraft, Workout};
    use pretty_assertions::assert_eq;

    async fn setup() -> LocalStore {
        LocalStore::open_in_memory().await.unwrap()
    }

    async fn seed(
        store: &LocalStore,
        date: NaiveDate,
        exercises: &[(&str, u32, u32, Option<f64>)],
    ) -> Workout {
        let workouts = WorkoutRepository::new(store);
        let workout = Workout::new(date, None);
        workouts.save(&workout).await.unwrap();
        for (name, sets, reps, weight) in exercises {
            let exercise = Exercise::from_draft(
                workout.local_id,
                ExerciseDraft {
                    name: (*name).to_string(),
                    sets: *sets,
                    reps: *reps,
                    weight: *weight,
                    notes: None,
                },
            );
            workouts.save_exercise(&exercise).await.unwrap();
        }
        workout
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_history_is_newest_first_and_case_insensitive() {
        let store = setup().await;
        seed(&store, day(2024, 3, 1), &[("Squat", 3, 5, Some(100.0))]).await;
        seed(&store, day(2024, 3, 8), &[("squat", 5, 5, Some(105.0))]).await;
        seed(&store, day(2024, 3, 5), &[("Bench Press", 3, 8, Some(80.0))]).await;

        let stats = StatsService::new(&store);
        let history = stats.exercise_history("SQUAT").await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, day(2024, 3, 8));
        assert_eq!(history[0].weight, Some(105.0));
        assert_eq!(history[1].date, day(2024, 3, 1));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_personal_record_picks_heaviest() {
        let store = setup().await;
        seed(&store, day(2024, 3, 1), &[("Squat", 3, 5, Some(110.0))]).await;
        seed(&store, day(2024, 3, 8), &[("Squat", 3, 5, Some(100.0))]).await;
        seed(&store, day(2024, 3, 15), &[("Squat", 3, 20, None)]).await;

        let stats = StatsService::new(&store);
        let pr = stats.personal_record("squat").await.unwrap().unwrap();
        assert_eq!(pr.weight, Some(110.0));
        assert_eq!(pr.date, day(2024, 3, 1));

        assert!(stats.personal_record("Deadlift").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_workout_volume_counts_reps_and_weighted_load() {
        let store = setup().await;
        let workout = seed(
            &store,
            day(2024, 3, 1),
            &[("Squat", 3, 5, Some(100.0)), ("Plank", 3, 10, None)],
        )
        .await;

        let stats = StatsService::new(&store);
        let totals = stats.workout_volume(workout.local_id).await.unwrap();
        assert_eq!(totals.total_reps, 45);
        assert_eq!(totals.weighted_volume, 1500.0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_weekly_volume_groups_by_week_and_tracks_change() {
        let store = setup().await;
        // 2024-03-03 and 2024-03-10 are Sundays.
        seed(&store, day(2024, 3, 4), &[("Squat", 3, 5, Some(100.0))]).await;
        seed(&store, day(2024, 3, 6), &[("Plank", 3, 10, None)]).await;
        seed(&store, day(2024, 3, 12), &[("Squat", 3, 5, Some(110.0))]).await;

        let stats = StatsService::new(&store);
        let weekly = stats.weekly_volume(4).await.unwrap();

        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].week_start, day(2024, 3, 3));
        assert_eq!(weekly[0].workout_count, 2);
        assert_eq!(weekly[0].total_reps, 45);
        assert_eq!(weekly[0].volume, 1545);
        assert_eq!(weekly[0].change_percent, 0);

        assert_eq!(weekly[1].week_start, day(2024, 3, 10));
        assert_eq!(weekly[1].volume, 1665);
        // (1665 - 1545) / 1545 rounds to 8 percent.
        assert_eq!(weekly[1].change_percent, 8);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_weekly_volume_keeps_only_recent_weeks() {
        let store = setup().await;
        seed(&store, day(2024, 2, 5), &[("Squat", 1, 1, None)]).await;
        seed(&store, day(2024, 3, 4), &[("Squat", 3, 5, Some(100.0))]).await;
        seed(&store, day(2024, 3, 12), &[("Squat", 3, 5, Some(100.0))]).await;

        let stats = StatsService::new(&store);
        let weekly = stats.weekly_volume(2).await.unwrap();

        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].week_start, day(2024, 3, 3));
        // The dropped week does not feed the first change figure.
        assert_eq!(weekly[0].change_percent, 0);
    }

    #[test]
    fn test_week_start_is_sunday() {
        assert_eq!(week_start(day(2024, 3, 3)), day(2024, 3, 3));
        assert_eq!(week_start(day(2024, 3, 9)), day(2024, 3, 3));
        assert_eq!(week_start(day(2024, 3, 10)), day(2024, 3, 10));
    }
}
