//! Stale-record cleanup
//!
//! Deletes records older than the configured age threshold regardless of
//! their processing status. Idempotent, and single-flight per sweeper
//! instance with its own run flag, independent of the batch processor's.

use crate::store::RecordStore;
use crate::types::CleanupResult;
use deferq_core::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Removes stale records from the backing collection
pub struct CleanupSweeper {
    store: Arc<RecordStore>,
    max_age: Duration,
    running: AtomicBool,
}

impl CleanupSweeper {
    /// Create a sweeper with a fixed age threshold
    pub fn new(store: Arc<RecordStore>, max_age: Duration) -> Self {
        Self {
            store,
            max_age,
            running: AtomicBool::new(false),
        }
    }

    /// Run one sweep, or skip if a sweep is already in flight.
    pub async fn run(&self) -> Result<CleanupResult> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Cleanup already in flight, skipping");
            return Ok(CleanupResult::Skipped);
        }

        let outcome = self.store.delete_stale(self.max_age).await;
        self.running.store(false, Ordering::SeqCst);
        outcome.map(|removed| CleanupResult::Completed { removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QueueRecord, RecordOutcome};
    use async_trait::async_trait;
    use chrono::Utc;
    use deferq_storage::{
        Document, Filter, FindOptions, MemoryStorage, StorageAdapter, Update,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::sync::Notify;

    async fn seed_record(storage: &MemoryStorage, age_secs: i64) -> QueueRecord {
        let mut record = QueueRecord::new(json!({}));
        record.created_at = Utc::now() - chrono::Duration::seconds(age_secs);
        record.updated_at = record.created_at;
        storage.insert(record.to_document().unwrap()).await.unwrap();
        record
    }

    #[tokio::test]
    async fn test_sweep_removes_only_stale_records() {
        let storage = MemoryStorage::new();
        let store = Arc::new(RecordStore::new(Arc::new(storage.clone())));
        let sweeper = CleanupSweeper::new(store.clone(), Duration::from_secs(60));

        let stale_done = seed_record(&storage, 600).await;
        seed_record(&storage, 300).await;
        let fresh = seed_record(&storage, 5).await;
        store.claim_batch(1).await.unwrap();
        store
            .mark_outcome(&stale_done.id, RecordOutcome::Success)
            .await
            .unwrap();

        let actual = sweeper.run().await.unwrap();

        assert_eq!(actual, CleanupResult::Completed { removed: 2 });
        assert!(store.get(&stale_done.id).await.unwrap().is_none());
        assert!(store.get(&fresh.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let storage = MemoryStorage::new();
        let store = Arc::new(RecordStore::new(Arc::new(storage.clone())));
        let sweeper = CleanupSweeper::new(store, Duration::from_secs(60));

        seed_record(&storage, 600).await;

        let first = sweeper.run().await.unwrap();
        let second = sweeper.run().await.unwrap();

        assert_eq!(first, CleanupResult::Completed { removed: 1 });
        assert_eq!(second, CleanupResult::Completed { removed: 0 });
    }

    /// Adapter that blocks inside `delete_many` until released by the test.
    struct BlockingDeleteStorage {
        inner: MemoryStorage,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl StorageAdapter for BlockingDeleteStorage {
        async fn insert(&self, document: Document) -> deferq_storage::Result<String> {
            self.inner.insert(document).await
        }

        async fn find_many(
            &self,
            filter: &Filter,
            options: FindOptions,
        ) -> deferq_storage::Result<Vec<Document>> {
            self.inner.find_many(filter, options).await
        }

        async fn update_one(
            &self,
            filter: &Filter,
            update: &Update,
        ) -> deferq_storage::Result<u64> {
            self.inner.update_one(filter, update).await
        }

        async fn delete_many(&self, filter: &Filter) -> deferq_storage::Result<u64> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.delete_many(filter).await
        }

        async fn count(&self, filter: &Filter) -> deferq_storage::Result<u64> {
            self.inner.count(filter).await
        }
    }

    #[tokio::test]
    async fn test_run_skips_while_sweep_in_flight() {
        let storage = Arc::new(BlockingDeleteStorage {
            inner: MemoryStorage::new(),
            entered: Notify::new(),
            release: Notify::new(),
        });
        let store = Arc::new(RecordStore::new(storage.clone()));
        let sweeper = Arc::new(CleanupSweeper::new(store, Duration::from_secs(60)));

        let in_flight = {
            let sweeper = sweeper.clone();
            tokio::spawn(async move { sweeper.run().await.unwrap() })
        };
        storage.entered.notified().await;

        // Second tick while the first sweep is blocked inside the store.
        let skipped = sweeper.run().await.unwrap();
        assert_eq!(skipped, CleanupResult::Skipped);

        storage.release.notify_one();
        let completed = in_flight.await.unwrap();
        assert_eq!(completed, CleanupResult::Completed { removed: 0 });

        // The flag is released once the sweep finishes.
        storage.release.notify_one();
        let next = sweeper.run().await.unwrap();
        assert_eq!(next, CleanupResult::Completed { removed: 0 });
    }

    #[tokio::test]
    async fn test_sweep_on_empty_collection() {
        let storage = MemoryStorage::new();
        let store = Arc::new(RecordStore::new(Arc::new(storage)));
        let sweeper = CleanupSweeper::new(store, Duration::from_secs(60));

        let actual = sweeper.run().await.unwrap();
        assert_eq!(actual, CleanupResult::Completed { removed: 0 });
    }
}
