//! Core types for the queue engine
//!
//! This module defines the record shape stored in the backing collection,
//! the record state machine, and the result types the engine reports back
//! to its callers.

use chrono::{DateTime, Utc};
use deferq_core::{generate_id_with_prefix, Error, Id, Json, Result};
use deferq_storage::Document;
use serde::{Deserialize, Serialize};

/// Unique identifier for a queue record
pub type RecordId = Id;

/// Status of a queue record
///
/// `Done` and `FailedPermanent` are terminal: a record never leaves them and
/// is never claimed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Waiting to be claimed by a batch
    Pending,
    /// Claimed by exactly one batch run
    Processing,
    /// Processed successfully
    Done,
    /// Retries exhausted, failure notification dispatched
    FailedPermanent,
}

impl RecordStatus {
    /// Get the stored string form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::FailedPermanent => "failed_permanent",
        }
    }

    /// Check whether the status is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::FailedPermanent)
    }
}

/// A record in the queue: the unit of work
///
/// Timestamps serialize as epoch milliseconds so range filters on the stored
/// document compare numbers rather than formatted strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueRecord {
    /// Unique record identifier, assigned at enqueue, immutable
    pub id: RecordId,
    /// Producer-supplied payload, opaque to the engine
    pub data: Json,
    /// Current status
    pub status: RecordStatus,
    /// Number of processing attempts started so far
    pub attempts: u32,
    /// Enqueue timestamp, immutable, drives cleanup
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Touched on every status transition
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl QueueRecord {
    /// Create a new pending record around a payload
    pub fn new(data: Json) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id_with_prefix("rec"),
            data,
            status: RecordStatus::Pending,
            attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Serialize the record into its stored document form
    pub fn to_document(&self) -> Result<Document> {
        match serde_json::to_value(self)? {
            Json::Object(document) => Ok(document),
            _ => Err(Error::generic("record did not serialize to an object")),
        }
    }

    /// Rebuild a record from its stored document form
    pub fn from_document(document: Document) -> Result<Self> {
        Ok(serde_json::from_value(Json::Object(document))?)
    }
}

/// Outcome of one processing attempt, as persisted by the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Processing succeeded
    Success,
    /// Processing failed but the record stays eligible for a future claim
    Retry,
    /// Retries exhausted, the record is permanently failed
    TerminalFailure,
}

impl RecordOutcome {
    /// The status a record transitions to under this outcome
    pub fn status(&self) -> RecordStatus {
        match self {
            Self::Success => RecordStatus::Done,
            Self::Retry => RecordStatus::Pending,
            Self::TerminalFailure => RecordStatus::FailedPermanent,
        }
    }
}

/// Aggregate counts reported by one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Records claimed for this batch
    pub claimed: u64,
    /// Records that completed successfully
    pub done: u64,
    /// Records re-queued for a future batch
    pub retried: u64,
    /// Records that reached permanent failure
    pub failed_permanent: u64,
}

/// Result of a `process_next_batch` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchResult {
    /// A batch was already in flight on this instance; no work was performed
    Skipped,
    /// The batch ran to completion
    Completed(BatchStats),
}

impl BatchResult {
    /// Check whether the invocation was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Result of a `cleanup` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupResult {
    /// A cleanup pass was already in flight on this instance
    Skipped,
    /// The sweep ran, removing the given number of stale records
    Completed { removed: u64 },
}

impl CleanupResult {
    /// Check whether the invocation was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Per-status record counts for the whole collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueStats {
    pub pending: u64,
    pub processing: u64,
    pub done: u64,
    pub failed_permanent: u64,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_record_starts_pending() {
        let fixture = json!({"message": "hello"});
        let actual = QueueRecord::new(fixture.clone());

        assert_eq!(actual.status, RecordStatus::Pending);
        assert_eq!(actual.attempts, 0);
        assert_eq!(actual.data, fixture);
        assert_eq!(actual.created_at, actual.updated_at);
        assert!(actual.id.as_str().starts_with("rec_"));
    }

    #[test]
    fn test_status_string_forms() {
        let fixture = vec![
            (RecordStatus::Pending, "pending"),
            (RecordStatus::Processing, "processing"),
            (RecordStatus::Done, "done"),
            (RecordStatus::FailedPermanent, "failed_permanent"),
        ];

        for (status, expected) in fixture {
            assert_eq!(status.as_str(), expected);
            let serialized = serde_json::to_string(&status).unwrap();
            assert_eq!(serialized, format!("\"{expected}\""));
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RecordStatus::Done.is_terminal());
        assert!(RecordStatus::FailedPermanent.is_terminal());
        assert!(!RecordStatus::Pending.is_terminal());
        assert!(!RecordStatus::Processing.is_terminal());
    }

    #[test]
    fn test_outcome_status_mapping() {
        assert_eq!(RecordOutcome::Success.status(), RecordStatus::Done);
        assert_eq!(RecordOutcome::Retry.status(), RecordStatus::Pending);
        assert_eq!(
            RecordOutcome::TerminalFailure.status(),
            RecordStatus::FailedPermanent
        );
    }

    #[test]
    fn test_record_document_round_trip() {
        let fixture = QueueRecord::new(json!({"n": 42}));

        let document = fixture.to_document().unwrap();
        let actual = QueueRecord::from_document(document).unwrap();

        assert_eq!(actual, fixture);
    }

    #[test]
    fn test_record_document_stores_millisecond_timestamps() {
        let fixture = QueueRecord::new(json!({}));
        let document = fixture.to_document().unwrap();

        let actual = document.get("created_at").unwrap().as_i64().unwrap();
        let expected = fixture.created_at.timestamp_millis();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_batch_result_skipped() {
        assert!(BatchResult::Skipped.is_skipped());
        assert!(!BatchResult::Completed(BatchStats::default()).is_skipped());
    }
}
