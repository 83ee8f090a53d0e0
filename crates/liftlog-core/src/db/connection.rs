//! Local store connection management and the generic collection contract.

use crate::error::{Error, Result};
use libsql::{Builder, Connection, Database as LibSqlDatabase};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use super::migrations;
use super::schema::{self, CollectionDef, IndexDef};

/// Durable local store: JSON-document collections over a libSQL database.
///
/// Collections and secondary indexes are fixed by [`schema::COLLECTIONS`];
/// opening the store runs migrations, so initialization is idempotent and
/// safe to repeat.
pub struct LocalStore {
    _db: LibSqlDatabase,
    conn: Connection,
}

impl LocalStore {
    /// Open the store at the given path, creating it if it doesn't exist.
    ///
    /// Runs migrations automatically.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let db = Builder::new_local(&path_str).build().await?;
        let conn = db.connect()?;

        let store = Self { _db: db, conn };
        store.configure().await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Open an in-memory store (useful for testing)
    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        let conn = db.connect()?;

        let store = Self { _db: db, conn };
        store.configure().await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Configure `SQLite` for local durability and concurrency
    async fn configure(&self) -> Result<()> {
        self.conn
            .execute("PRAGMA journal_mode = WAL;", ())
            .await
            .ok();
        self.conn
            .execute("PRAGMA synchronous = NORMAL;", ())
            .await
            .ok();
        self.conn.execute("PRAGMA foreign_keys = ON;", ()).await?;
        Ok(())
    }

    /// Run store migrations
    async fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn).await
    }

    /// Upsert a value at `key`; overwrites any existing value.
    ///
    /// The write is durable before this returns.
    pub async fn put<T: Serialize>(&self, collection: &str, key: &str, value: &T) -> Result<()> {
        let def = resolve_collection(collection)?;
        let json = serde_json::to_string(value)?;
        let sql = format!("INSERT OR REPLACE INTO {} (key, value) VALUES (?1, ?2)", def.name);
        self.conn.execute(&sql, libsql::params![key, json]).await?;
        Ok(())
    }

    /// Fetch the value at `key`, or `None` when absent.
    pub async fn get<T: DeserializeOwned>(&self, collection: &str, key: &str) -> Result<Option<T>> {
        let def = resolve_collection(collection)?;
        let sql = format!("SELECT value FROM {} WHERE key = ?1", def.name);
        let mut rows = self.conn.query(&sql, libsql::params![key]).await?;

        match rows.next().await? {
            Some(row) => {
                let json: String = row.get(0)?;
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    /// Fetch all values in a collection (unordered unless the caller sorts).
    pub async fn get_all<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let def = resolve_collection(collection)?;
        let sql = format!("SELECT value FROM {}", def.name);
        let mut rows = self.conn.query(&sql, ()).await?;

        let mut values = Vec::new();
        while let Some(row) = rows.next().await? {
            let json: String = row.get(0)?;
            values.push(serde_json::from_str(&json)?);
        }
        Ok(values)
    }

    /// Fetch all raw `(key, value)` pairs in key order.
    ///
    /// Used where per-row parse failures must be tolerated (the outbox skips
    /// entries of entity types it does not handle).
    pub async fn get_all_raw_ordered(&self, collection: &str) -> Result<Vec<(String, String)>> {
        let def = resolve_collection(collection)?;
        let sql = format!("SELECT key, value FROM {} ORDER BY key", def.name);
        let mut rows = self.conn.query(&sql, ()).await?;

        let mut pairs = Vec::new();
        while let Some(row) = rows.next().await? {
            pairs.push((row.get(0)?, row.get(1)?));
        }
        Ok(pairs)
    }

    /// Equality lookup on a declared secondary index.
    ///
    /// Unknown collection/index names are programming errors and fail fast.
    pub async fn get_all_by_index<T: DeserializeOwned>(
        &self,
        collection: &str,
        index: &str,
        value: impl Into<libsql::Value>,
    ) -> Result<Vec<T>> {
        let def = resolve_collection(collection)?;
        let idx = resolve_index(def, index)?;
        let sql = format!(
            "SELECT value FROM {} WHERE json_extract(value, '{}') = ?1",
            def.name, idx.json_path
        );
        let mut rows = self.conn.query(&sql, libsql::params![value.into()]).await?;

        let mut values = Vec::new();
        while let Some(row) = rows.next().await? {
            let json: String = row.get(0)?;
            values.push(serde_json::from_str(&json)?);
        }
        Ok(values)
    }

    /// Delete the value at `key`. Deleting an absent key is a no-op, so
    /// re-running an interrupted composite deletion is safe.
    pub async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let def = resolve_collection(collection)?;
        let sql = format!("DELETE FROM {} WHERE key = ?1", def.name);
        self.conn.execute(&sql, libsql::params![key]).await?;
        Ok(())
    }

    /// Remove every value in a collection.
    pub async fn clear(&self, collection: &str) -> Result<()> {
        let def = resolve_collection(collection)?;
        let sql = format!("DELETE FROM {}", def.name);
        self.conn.execute(&sql, ()).await?;
        Ok(())
    }

    /// Number of values in a collection.
    pub async fn count(&self, collection: &str) -> Result<usize> {
        let def = resolve_collection(collection)?;
        let sql = format!("SELECT COUNT(*) FROM {}", def.name);
        let mut rows = self.conn.query(&sql, ()).await?;

        let count: i64 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };
        usize::try_from(count).map_err(|_| Error::Database("negative row count".to_string()))
    }
}

fn resolve_collection(name: &str) -> Result<&'static CollectionDef> {
    schema::collection(name)
        .ok_or_else(|| Error::InvalidInput(format!("unknown collection: {name}")))
}

fn resolve_index(def: &'static CollectionDef, index: &str) -> Result<&'static IndexDef> {
    def.indexes
        .iter()
        .find(|idx| idx.name == index)
        .ok_or_else(|| {
            Error::InvalidInput(format!("unknown index {index} on collection {}", def.name))
        })
}
