//! Identity resolution for queued mutations.
//!
//! A queued action is interpreted against the record's identity *at send
//! time*, not at enqueue time. A record may gain a server ID between the two
//! (an earlier create in the same pass succeeded), so updates on still-local
//! records are promoted to creates rather than failed.

use crate::models::{OutboxAction, Workout};

/// What a queued action resolves to once current identity is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAction {
    /// Send as a create; the record has no server identity yet.
    Create,
    /// Send as an update against this server ID.
    Update(String),
    /// Send as a delete against this server ID.
    Delete(String),
    /// Nothing to send; the entry is removed without a network call.
    Drop,
}

/// Resolve a queued action against the record as it exists right now.
///
/// `current` is the live local record (`None` if it was deleted locally after
/// the entry was queued). `snapshot_server_id` is the server ID captured in
/// the entry's snapshot, used only for deletes, where the record is already
/// gone locally.
pub fn resolve(
    action: OutboxAction,
    snapshot_server_id: Option<&str>,
    current: Option<&Workout>,
) -> ResolvedAction {
    match action {
        OutboxAction::Create | OutboxAction::Update => {
            let Some(workout) = current else {
                // Deleted locally before this entry was sent. The delete
                // entry (if any) carries the remote removal.
                return ResolvedAction::Drop;
            };
            match &workout.server_id {
                None => ResolvedAction::Create,
                Some(id) => ResolvedAction::Update(id.clone()),
            }
        }
        OutboxAction::Delete => match snapshot_server_id {
            Some(id) => ResolvedAction::Delete(id.to_string()),
            // Never reached the server, so there is nothing to delete there.
            None => ResolvedAction::Drop,
        },
    }
}
