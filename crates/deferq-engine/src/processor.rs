//! Batch processing
//!
//! Claims a batch of pending records, runs the configured handler over them
//! serially in claimed order, and persists each outcome. One record's
//! processing failure never aborts the batch; a storage failure aborts only
//! the remaining work of the tick. At most one batch runs per processor
//! instance at a time.

use crate::retry::{RetryAccountant, RetryDecision};
use crate::store::RecordStore;
use crate::traits::RecordHandler;
use crate::types::{BatchResult, BatchStats, QueueRecord, RecordOutcome, RecordStatus};
use deferq_core::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Claims and processes one batch at a time
pub struct BatchProcessor {
    store: Arc<RecordStore>,
    handler: Arc<dyn RecordHandler>,
    batch_size: usize,
    retry_limit: u32,
    running: AtomicBool,
}

impl BatchProcessor {
    /// Create a processor over a record store and handler
    pub fn new(
        store: Arc<RecordStore>,
        handler: Arc<dyn RecordHandler>,
        batch_size: usize,
        retry_limit: u32,
    ) -> Self {
        Self {
            store,
            handler,
            batch_size,
            retry_limit,
            running: AtomicBool::new(false),
        }
    }

    /// Run one batch, or skip if a batch is already in flight.
    ///
    /// The run flag is process-local; across engine instances only the
    /// claim-level conditional update protects against double-processing.
    pub async fn run(&self) -> Result<BatchResult> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Batch already in flight, skipping");
            return Ok(BatchResult::Skipped);
        }

        let outcome = self.run_batch().await;
        self.running.store(false, Ordering::SeqCst);
        outcome.map(BatchResult::Completed)
    }

    async fn run_batch(&self) -> Result<BatchStats> {
        let records = self.store.claim_batch(self.batch_size).await?;
        let mut stats = BatchStats {
            claimed: records.len() as u64,
            ..BatchStats::default()
        };

        for record in records {
            match self.handler.process(&record).await {
                Ok(()) => {
                    self.store
                        .mark_outcome(&record.id, RecordOutcome::Success)
                        .await?;
                    stats.done += 1;
                }
                Err(error) => {
                    debug!("Record {} failed processing: {}", record.id, error);
                    match RetryAccountant::decide(record.attempts, self.retry_limit) {
                        RetryDecision::Retry => {
                            self.store
                                .mark_outcome(&record.id, RecordOutcome::Retry)
                                .await?;
                            stats.retried += 1;
                        }
                        RetryDecision::Terminal => {
                            // Terminal status is persisted before notification:
                            // a failing on_failure must not resurrect the record.
                            self.store
                                .mark_outcome(&record.id, RecordOutcome::TerminalFailure)
                                .await?;
                            self.notify_failure(record).await;
                            stats.failed_permanent += 1;
                        }
                    }
                }
            }
        }

        debug!(
            "Batch complete: {} done, {} retried, {} failed permanently",
            stats.done, stats.retried, stats.failed_permanent
        );
        Ok(stats)
    }

    /// Best-effort, single-attempt failure notification.
    async fn notify_failure(&self, mut record: QueueRecord) {
        record.status = RecordStatus::FailedPermanent;
        if let Err(error) = self.handler.on_failure(&record).await {
            warn!(
                "Failure notification for record {} failed: {}",
                record.id, error
            );
        }
    }
}
