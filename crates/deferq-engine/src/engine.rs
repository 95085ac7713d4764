//! Queue engine facade
//!
//! Composes the record store, batch processor, and cleanup sweeper behind the
//! three public operations: `enqueue` for producers, `process_next_batch` and
//! `cleanup` for the external scheduling clock. The engine is reactive; it
//! performs work only when one of these is invoked.

use crate::config::EngineConfig;
use crate::processor::BatchProcessor;
use crate::store::RecordStore;
use crate::sweeper::CleanupSweeper;
use crate::traits::RecordHandler;
use crate::types::{BatchResult, CleanupResult, QueueRecord, QueueStats, RecordId};
use deferq_core::{Json, Result};
use deferq_storage::StorageAdapter;
use std::sync::Arc;
use tracing::info;

/// Persistent work queue over a document collection
pub struct QueueEngine {
    store: Arc<RecordStore>,
    processor: BatchProcessor,
    sweeper: CleanupSweeper,
    config: EngineConfig,
}

impl QueueEngine {
    /// Create an engine over a collection-bound storage adapter and handler.
    ///
    /// Fails fast with a configuration error before any processing begins.
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        handler: Arc<dyn RecordHandler>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(RecordStore::new(storage));
        let processor = BatchProcessor::new(
            store.clone(),
            handler,
            config.batch_size,
            config.retry_limit,
        );
        let sweeper = CleanupSweeper::new(store.clone(), config.max_record_age);

        info!(
            collection = %config.collection_name,
            batch_size = config.batch_size,
            retry_limit = config.retry_limit,
            "Queue engine initialized"
        );
        Ok(Self {
            store,
            processor,
            sweeper,
            config,
        })
    }

    /// Insert a record for later processing; write-and-forget for producers.
    ///
    /// Never blocks on an in-flight batch. Storage failures surface
    /// unchanged.
    pub async fn enqueue(&self, data: Json) -> Result<RecordId> {
        self.store.enqueue(data).await
    }

    /// Claim and process the next batch, or skip if one is already running
    /// on this instance.
    pub async fn process_next_batch(&self) -> Result<BatchResult> {
        self.processor.run().await
    }

    /// Remove records older than the configured age threshold, or skip if a
    /// sweep is already running on this instance.
    pub async fn cleanup(&self) -> Result<CleanupResult> {
        self.sweeper.run().await
    }

    /// Fetch a record by id.
    pub async fn get_record(&self, id: &RecordId) -> Result<Option<QueueRecord>> {
        self.store.get(id).await
    }

    /// Per-status record counts for the backing collection.
    pub async fn stats(&self) -> Result<QueueStats> {
        self.store.stats().await
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
