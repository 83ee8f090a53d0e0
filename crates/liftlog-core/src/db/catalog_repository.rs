//! Exercise catalog repository (cached reference data)

use crate::db::schema::CATALOG;
use crate::db::LocalStore;
use crate::error::Result;
use crate::models::{default_catalog, CatalogExercise};

/// Typed access to the cached exercise catalog.
pub struct CatalogRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new repository over the given store
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Seed the built-in catalog if the collection is empty.
    pub async fn seed_defaults(&self) -> Result<usize> {
        if self.store.count(CATALOG).await? > 0 {
            return Ok(0);
        }

        let entries = default_catalog();
        for entry in &entries {
            self.store.put(CATALOG, &entry.id, entry).await?;
        }
        tracing::debug!("Seeded exercise catalog with {} entries", entries.len());
        Ok(entries.len())
    }

    /// Exact name lookup via the catalog's name index.
    pub async fn by_name(&self, name: &str) -> Result<Option<CatalogExercise>> {
        let matches: Vec<CatalogExercise> = self
            .store
            .get_all_by_index(CATALOG, "name", name.to_string())
            .await?;
        Ok(matches.into_iter().next())
    }

    /// Case-insensitive substring search.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogExercise>> {
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<CatalogExercise> = self
            .store
            .get_all(CATALOG)
            .await?
            .into_iter()
            .filter(|e: &CatalogExercise| e.name.to_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }
}
