//! Record persistence over the storage adapter
//!
//! Maps the engine's domain operations onto [`StorageAdapter`] calls and owns
//! the on-disk record shape. This is the only writer of `status`, `attempts`,
//! and `updated_at`.

use crate::types::{QueueRecord, QueueStats, RecordId, RecordOutcome, RecordStatus};
use chrono::Utc;
use deferq_core::{Error, Json, Result};
use deferq_storage::{Filter, FindOptions, SortOrder, StorageAdapter, StorageError, Update};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Document field names for the stored record shape
mod fields {
    pub const ID: &str = "id";
    pub const STATUS: &str = "status";
    pub const ATTEMPTS: &str = "attempts";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
}

/// Domain operations over the backing collection
pub struct RecordStore {
    storage: Arc<dyn StorageAdapter>,
}

impl RecordStore {
    /// Create a store over a collection-bound storage adapter
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Insert a new pending record, returning its id.
    ///
    /// Storage failures surface unchanged; there is no retry at this layer.
    pub async fn enqueue(&self, data: Json) -> Result<RecordId> {
        let record = QueueRecord::new(data);
        let document = record.to_document()?;

        self.storage
            .insert(document)
            .await
            .map_err(into_storage_error)?;

        debug!("Enqueued record {}", record.id);
        Ok(record.id)
    }

    /// Claim up to `limit` pending records, oldest first.
    ///
    /// Each candidate is flipped to `processing` by a conditional update keyed
    /// on the status and attempt count observed at read time, so a record can
    /// only ever be claimed by one caller. Candidates lost to a concurrent
    /// claimant are dropped from the batch rather than treated as errors.
    pub async fn claim_batch(&self, limit: usize) -> Result<Vec<QueueRecord>> {
        let pending = Filter::new().eq(fields::STATUS, RecordStatus::Pending.as_str());
        let options = FindOptions::new()
            .sort_by(fields::CREATED_AT, SortOrder::Ascending)
            .limit(limit);

        let candidates = self
            .storage
            .find_many(&pending, options)
            .await
            .map_err(into_storage_error)?;

        let mut claimed = Vec::with_capacity(candidates.len());
        for document in candidates {
            let mut record = QueueRecord::from_document(document)?;
            let now = Utc::now();

            let claim_filter = Filter::new()
                .eq(fields::ID, record.id.as_str())
                .eq(fields::STATUS, RecordStatus::Pending.as_str())
                .eq(fields::ATTEMPTS, record.attempts);
            let claim = Update::new()
                .set(fields::STATUS, RecordStatus::Processing.as_str())
                .set(fields::ATTEMPTS, record.attempts + 1)
                .set(fields::UPDATED_AT, now.timestamp_millis());

            let matched = self
                .storage
                .update_one(&claim_filter, &claim)
                .await
                .map_err(into_storage_error)?;

            if matched == 1 {
                record.status = RecordStatus::Processing;
                record.attempts += 1;
                record.updated_at = now;
                claimed.push(record);
            } else {
                debug!("Record {} claimed elsewhere, dropping from batch", record.id);
            }
        }

        debug!("Claimed {} records", claimed.len());
        Ok(claimed)
    }

    /// Persist the outcome of a processing attempt.
    ///
    /// The update is keyed on `status = processing`, the same conditional
    /// discipline as claiming: only a claimed record can transition, so a
    /// terminal or re-queued record can never be overwritten by a stray
    /// outcome. A miss is not fatal: the record may have been swept by
    /// cleanup while it was being processed.
    pub async fn mark_outcome(&self, id: &RecordId, outcome: RecordOutcome) -> Result<()> {
        let status = outcome.status();
        let filter = Filter::new()
            .eq(fields::ID, id.as_str())
            .eq(fields::STATUS, RecordStatus::Processing.as_str());
        let update = Update::new()
            .set(fields::STATUS, status.as_str())
            .set(fields::UPDATED_AT, Utc::now().timestamp_millis());

        let matched = self
            .storage
            .update_one(&filter, &update)
            .await
            .map_err(into_storage_error)?;

        if matched == 0 {
            warn!("Record {} no longer claimed, outcome {} dropped", id, status.as_str());
        } else {
            debug!("Record {} -> {}", id, status.as_str());
        }
        Ok(())
    }

    /// Delete every record older than `max_age`, regardless of status.
    pub async fn delete_stale(&self, max_age: Duration) -> Result<u64> {
        let max_age = chrono::Duration::from_std(max_age)
            .map_err(|e| Error::config(format!("max_record_age out of range: {e}")))?;
        let cutoff = Utc::now() - max_age;

        let stale = Filter::new().lt(fields::CREATED_AT, cutoff.timestamp_millis());
        let removed = self
            .storage
            .delete_many(&stale)
            .await
            .map_err(into_storage_error)?;

        if removed > 0 {
            info!("Removed {} stale records", removed);
        }
        Ok(removed)
    }

    /// Count records per status across the whole collection.
    pub async fn stats(&self) -> Result<QueueStats> {
        let count_status = |status: RecordStatus| {
            let filter = Filter::new().eq(fields::STATUS, status.as_str());
            async move {
                self.storage
                    .count(&filter)
                    .await
                    .map_err(into_storage_error)
            }
        };

        let pending = count_status(RecordStatus::Pending).await?;
        let processing = count_status(RecordStatus::Processing).await?;
        let done = count_status(RecordStatus::Done).await?;
        let failed_permanent = count_status(RecordStatus::FailedPermanent).await?;

        Ok(QueueStats {
            pending,
            processing,
            done,
            failed_permanent,
            total: pending + processing + done + failed_permanent,
        })
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: &RecordId) -> Result<Option<QueueRecord>> {
        let filter = Filter::new().eq(fields::ID, id.as_str());
        let mut documents = self
            .storage
            .find_many(&filter, FindOptions::new().limit(1))
            .await
            .map_err(into_storage_error)?;

        match documents.pop() {
            Some(document) => Ok(Some(QueueRecord::from_document(document)?)),
            None => Ok(None),
        }
    }
}

fn into_storage_error(error: StorageError) -> Error {
    Error::storage(error.to_string())
}
