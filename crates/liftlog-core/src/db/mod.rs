//! Durable local store for liftlog
//!
//! A transactional, collection-oriented store over libSQL. The generic
//! contract lives on [`LocalStore`]; typed repositories wrap it for each
//! collection.

mod catalog_repository;
mod connection;
mod migrations;
mod outbox_repository;
pub mod schema;
mod settings_repository;
mod workout_repository;

pub use catalog_repository::CatalogRepository;
pub use connection::LocalStore;
pub use outbox_repository::OutboxRepository;
pub use settings_repository::SettingsRepository;
pub use workout_repository::WorkoutRepository;
