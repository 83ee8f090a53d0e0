//! Outbox repository: the durable sync queue.

use crate::db::schema::OUTBOX;
use crate::db::LocalStore;
use crate::error::Result;
use crate::models::{OutboxEntry, OutboxEntryId};

/// Typed operations over the outbox collection.
pub struct OutboxRepository<'a> {
    store: &'a LocalStore,
}

impl<'a> OutboxRepository<'a> {
    /// Create a new repository over the given store
    pub const fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Append an entry. The entry is durable before this returns; triggering
    /// a sync pass is the caller's concern and never blocks the append.
    pub async fn enqueue(&self, entry: &OutboxEntry) -> Result<()> {
        self.store.put(OUTBOX, &entry.id.as_str(), entry).await
    }

    /// All entries in enqueue order (entry IDs are UUID v7, so key order is
    /// insertion order).
    ///
    /// Stored entries with an entity type this build does not handle are
    /// skipped and left in the queue for a future version.
    pub async fn all_ordered(&self) -> Result<Vec<OutboxEntry>> {
        let pairs = self.store.get_all_raw_ordered(OUTBOX).await?;

        let mut entries = Vec::with_capacity(pairs.len());
        for (key, json) in pairs {
            match serde_json::from_str::<OutboxEntry>(&json) {
                Ok(entry) => entries.push(entry),
                Err(error) => {
                    tracing::debug!("Skipping unhandled outbox entry {key}: {error}");
                }
            }
        }
        Ok(entries)
    }

    /// Remove an entry. Called only after confirmed remote success (or when
    /// the entry is resolved as a local no-op).
    pub async fn remove(&self, id: OutboxEntryId) -> Result<()> {
        self.store.delete(OUTBOX, &id.as_str()).await
    }

    /// Persist an entry back with its incremented retry count. The ID is
    /// unchanged, so the entry keeps its position in the queue.
    pub async fn requeue(&self, entry: &OutboxEntry) -> Result<()> {
        self.store.put(OUTBOX, &entry.id.as_str(), entry).await
    }

    /// Number of queued entries, parked ones included.
    pub async fn len(&self) -> Result<usize> {
        self.store.count(OUTBOX).await
    }

    /// Whether the queue is empty.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::OUTBOX;
    use crate::models::{OutboxAction, OutboxPayload, Workout, WorkoutSnapshot};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    async fn setup() -> LocalStore {
        LocalStore::open_in_memory().await.unwrap()
    }

    fn entry(action: OutboxAction) -> OutboxEntry {
        let workout = Workout::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), None);
        let snapshot = WorkoutSnapshot::capture(&workout, Vec::new());
        OutboxEntry::new(action, workout.local_id, OutboxPayload::Workout(snapshot))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_enqueue_preserves_order() {
        let store = setup().await;
        let outbox = OutboxRepository::new(&store);

        let first = entry(OutboxAction::Create);
        let second = entry(OutboxAction::Update);
        let third = entry(OutboxAction::Update);
        for e in [&first, &second, &third] {
            outbox.enqueue(e).await.unwrap();
        }

        let entries = outbox.all_ordered().await.unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_requeue_keeps_position() {
        let store = setup().await;
        let outbox = OutboxRepository::new(&store);

        let mut first = entry(OutboxAction::Create);
        let second = entry(OutboxAction::Update);
        outbox.enqueue(&first).await.unwrap();
        outbox.enqueue(&second).await.unwrap();

        first.record_failure();
        outbox.requeue(&first).await.unwrap();

        let entries = outbox.all_ordered().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, first.id);
        assert_eq!(entries[0].retry_count, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remove() {
        let store = setup().await;
        let outbox = OutboxRepository::new(&store);

        let e = entry(OutboxAction::Create);
        outbox.enqueue(&e).await.unwrap();
        assert_eq!(outbox.len().await.unwrap(), 1);

        outbox.remove(e.id).await.unwrap();
        assert!(outbox.is_empty().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unhandled_entity_types_are_skipped_not_dropped() {
        let store = setup().await;
        let outbox = OutboxRepository::new(&store);

        let known = entry(OutboxAction::Create);
        outbox.enqueue(&known).await.unwrap();

        let foreign = serde_json::json!({
            "id": "00000000-0000-7000-8000-000000000001",
            "action": "create",
            "entity_id": "00000000-0000-7000-8000-000000000002",
            "payload": { "entity_type": "meal", "data": {} },
            "timestamp": 0,
            "retry_count": 0
        });
        store
            .put(OUTBOX, "00000000-0000-7000-8000-000000000001", &foreign)
            .await
            .unwrap();

        let entries = outbox.all_ordered().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, known.id);

        // The foreign entry stays queued for a future version.
        assert_eq!(outbox.len().await.unwrap(), 2);
    }
}
