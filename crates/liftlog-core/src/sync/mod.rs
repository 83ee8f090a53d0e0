//! Sync subsystem: connectivity, identity resolution, and the engine that
//! drains the outbox.

mod connectivity;
mod engine;
pub mod identity;
mod status;

pub use connectivity::Connectivity;
pub use engine::{SyncEngine, SyncReport, SyncTrigger, AUTO_SYNC_INTERVAL};
pub use identity::ResolvedAction;
pub use status::SyncStatusHandle;
