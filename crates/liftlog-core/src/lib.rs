//! liftlog-core - Core library for Liftlog
//!
//! This crate contains the offline-first storage layer, the outbox-based
//! sync engine, and the workout domain logic shared by all Liftlog
//! interfaces.

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod services;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{LocalId, SyncStatus, Workout};
