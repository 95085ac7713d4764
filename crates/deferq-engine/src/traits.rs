use crate::types::QueueRecord;
use async_trait::async_trait;
use deferq_core::Result;

/// User-supplied processing and failure-notification callbacks
///
/// The engine treats both methods as opaque. Any `Err` from `process` counts
/// as a processing failure for that record, whether the handler signalled it
/// deliberately or bubbled it up with `?`. `on_failure` is invoked once per
/// record reaching permanent failure; its own error is logged, never retried,
/// and never alters the record's terminal status.
///
/// Handlers are expected to honor their own timeout or cancellation signal:
/// the engine will not kill a running callback, and a hung `process` call
/// stalls the in-flight batch until it returns.
#[async_trait]
pub trait RecordHandler: Send + Sync {
    /// Process one claimed record
    async fn process(&self, record: &QueueRecord) -> Result<()>;

    /// Notified once when a record reaches permanent failure
    async fn on_failure(&self, record: &QueueRecord) -> Result<()>;
}
