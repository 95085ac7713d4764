//! # deferq-engine
//!
//! Batch processing engine for the deferq persistent work queue. Producers
//! enqueue opaque records into a document collection and forget about them;
//! an external scheduling clock ticks the engine, which claims bounded
//! batches, runs a user-supplied handler over each record serially, retries
//! failures up to a configured limit, escalates exhausted records to a
//! one-shot failure notification, and sweeps out stale records.
//!
//! ## Architecture
//!
//! - **RecordStore**: maps queue operations onto the storage adapter and owns
//!   the stored record shape
//! - **RetryAccountant**: pure retryable-or-terminal decision
//! - **BatchProcessor**: claims and serially processes one batch at a time
//! - **CleanupSweeper**: age-based deletion, independent of record status
//! - **QueueEngine**: public facade over the above
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use deferq_engine::{EngineConfig, QueueEngine, QueueRecord, RecordHandler};
//! use deferq_storage::MemoryStorage;
//! use serde_json::json;
//!
//! struct Mailer;
//!
//! #[async_trait]
//! impl RecordHandler for Mailer {
//!     async fn process(&self, _record: &QueueRecord) -> deferq_core::Result<()> {
//!         // deliver the payload somewhere
//!         Ok(())
//!     }
//!
//!     async fn on_failure(&self, _record: &QueueRecord) -> deferq_core::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> deferq_core::Result<()> {
//! let engine = QueueEngine::new(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(Mailer),
//!     EngineConfig::default(),
//! )?;
//!
//! engine.enqueue(json!({"to": "ops@example.com"})).await?;
//! engine.process_next_batch().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod processor;
pub mod retry;
pub mod store;
pub mod sweeper;
pub mod traits;
pub mod types;

// Re-export common types and traits
pub use config::EngineConfig;
pub use engine::QueueEngine;
pub use processor::BatchProcessor;
pub use retry::{RetryAccountant, RetryDecision};
pub use store::RecordStore;
pub use sweeper::CleanupSweeper;
pub use traits::RecordHandler;
pub use types::{
    BatchResult, BatchStats, CleanupResult, QueueRecord, QueueStats, RecordId, RecordOutcome,
    RecordStatus,
};
