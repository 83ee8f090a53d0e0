//! Exercise catalog model (cached reference data)

use serde::{Deserialize, Serialize};

/// A known exercise in the locally-cached reference catalog.
///
/// The catalog is seeded from a built-in list and used for name lookups;
/// it is never synced through the outbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogExercise {
    /// Stable catalog key (kebab-case name)
    pub id: String,
    /// Display name
    pub name: String,
    /// Primary muscle group
    pub muscle_group: String,
}

impl CatalogExercise {
    #[must_use]
    pub fn new(name: &str, muscle_group: &str) -> Self {
        Self {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            muscle_group: muscle_group.to_string(),
        }
    }
}

/// Built-in catalog entries seeded on first run.
#[must_use]
pub fn default_catalog() -> Vec<CatalogExercise> {
    [
        ("Squat", "legs"),
        ("Front Squat", "legs"),
        ("Leg Press", "legs"),
        ("Romanian Deadlift", "hamstrings"),
        ("Deadlift", "back"),
        ("Barbell Row", "back"),
        ("Pull Up", "back"),
        ("Lat Pulldown", "back"),
        ("Bench Press", "chest"),
        ("Incline Bench Press", "chest"),
        ("Dumbbell Fly", "chest"),
        ("Overhead Press", "shoulders"),
        ("Lateral Raise", "shoulders"),
        ("Barbell Curl", "biceps"),
        ("Hammer Curl", "biceps"),
        ("Triceps Pushdown", "triceps"),
        ("Dips", "triceps"),
        ("Plank", "core"),
        ("Crunch", "core"),
    ]
    .into_iter()
    .map(|(name, group)| CatalogExercise::new(name, group))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_kebab_case() {
        let exercise = CatalogExercise::new("Bench Press", "chest");
        assert_eq!(exercise.id, "bench-press");
    }

    #[test]
    fn test_default_catalog_has_unique_ids() {
        let catalog = default_catalog();
        let mut ids: Vec<_> = catalog.iter().map(|e| e.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }
}
