//! Database migrations
//!
//! Schema upgrades are additive and non-destructive: new versions only add
//! collections and indexes, never drop or rewrite existing data.

use crate::error::Result;
use libsql::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub async fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn).await?;

    if version < 1 {
        migrate_v1(conn).await?;
    }
    if version < 2 {
        migrate_v2(conn).await?;
    }

    Ok(())
}

/// Get the current schema version
async fn get_version(conn: &Connection) -> Result<i32> {
    // Check if schema_version table exists
    let mut rows = conn
        .query(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            (),
        )
        .await?;

    let exists: bool = if let Some(row) = rows.next().await? {
        row.get::<i32>(0)? != 0
    } else {
        false
    };

    if !exists {
        return Ok(0);
    }

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;

    let version: i32 = if let Some(row) = rows.next().await? {
        row.get(0)?
    } else {
        0
    };

    Ok(version)
}

/// Migration to version 1: core collections and their indexes
async fn migrate_v1(conn: &Connection) -> Result<()> {
    // libsql doesn't have execute_batch, so we run each statement separately
    // inside a transaction.

    conn.execute("BEGIN TRANSACTION", ()).await?;

    let statements = [
        // Schema version tracking
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        // Workout records, keyed by local ID
        "CREATE TABLE IF NOT EXISTS workouts (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_workouts_server_id
            ON workouts (json_extract(value, '$.server_id'))",
        // Child exercises, keyed by local ID
        "CREATE TABLE IF NOT EXISTS exercises (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_exercises_workout_local_id
            ON exercises (json_extract(value, '$.workout_local_id'))",
        // Outbox: pending remote mutations, key order is enqueue order
        "CREATE TABLE IF NOT EXISTS outbox (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_outbox_timestamp
            ON outbox (json_extract(value, '$.timestamp'))",
        // Settings (local only)
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        // Record migration version
        "INSERT INTO schema_version (version) VALUES (1)",
    ];

    for stmt in statements {
        if let Err(e) = conn.execute(stmt, ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }
    }

    if let Err(e) = conn.execute("COMMIT", ()).await {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(e.into());
    }

    tracing::info!("Migrated local store to version 1");
    Ok(())
}

/// Migration to version 2: cached exercise catalog and status lookups
async fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", ()).await?;

    let statements = [
        "CREATE TABLE IF NOT EXISTS catalog (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_catalog_name
            ON catalog (json_extract(value, '$.name'))",
        "CREATE INDEX IF NOT EXISTS idx_workouts_sync_status
            ON workouts (json_extract(value, '$.sync_status'))",
        "INSERT INTO schema_version (version) VALUES (2)",
    ];

    for stmt in statements {
        if let Err(e) = conn.execute(stmt, ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }
    }

    if let Err(e) = conn.execute("COMMIT", ()).await {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(e.into());
    }

    tracing::info!("Migrated local store to version {CURRENT_VERSION}");
    Ok(())
}
