//! Static collection and index definitions for the local store.
//!
//! Collections are tables of `(key, value)` rows where `value` is a JSON
//! document; secondary indexes are SQLite expression indexes over
//! `json_extract(value, path)`. Collection and index names referenced at
//! runtime are validated against these definitions, so table names never
//! come from caller data.

/// A secondary equality index on a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    /// Index name used by callers of `get_all_by_index`
    pub name: &'static str,
    /// JSON path into the stored value, e.g. `$.workout_local_id`
    pub json_path: &'static str,
}

/// A named collection in the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionDef {
    pub name: &'static str,
    pub indexes: &'static [IndexDef],
}

pub const WORKOUTS: &str = "workouts";
pub const EXERCISES: &str = "exercises";
pub const OUTBOX: &str = "outbox";
pub const CATALOG: &str = "catalog";
pub const SETTINGS: &str = "settings";

/// All collections known to the current schema version.
pub const COLLECTIONS: &[CollectionDef] = &[
    CollectionDef {
        name: WORKOUTS,
        indexes: &[
            IndexDef {
                name: "server_id",
                json_path: "$.server_id",
            },
            IndexDef {
                name: "sync_status",
                json_path: "$.sync_status",
            },
        ],
    },
    CollectionDef {
        name: EXERCISES,
        indexes: &[IndexDef {
            name: "workout_local_id",
            json_path: "$.workout_local_id",
        }],
    },
    CollectionDef {
        name: OUTBOX,
        indexes: &[IndexDef {
            name: "timestamp",
            json_path: "$.timestamp",
        }],
    },
    CollectionDef {
        name: CATALOG,
        indexes: &[IndexDef {
            name: "name",
            json_path: "$.name",
        }],
    },
    CollectionDef {
        name: SETTINGS,
        indexes: &[],
    },
];

/// Look up a collection definition by name.
#[must_use]
pub fn collection(name: &str) -> Option<&'static CollectionDef> {
    COLLECTIONS.iter().find(|def| def.name == name)
}

/// Look up an index definition on a collection.
#[must_use]
pub fn index(collection_name: &str, index_name: &str) -> Option<&'static IndexDef> {
    collection(collection_name)?
        .indexes
        .iter()
        .find(|def| def.name == index_name)
}
