use deferq_core::{Error, Result};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a queue engine instance
///
/// `process_cron` and `cleanup_cron` are carried for the external scheduler
/// that decides when to invoke `process_next_batch` and `cleanup`; the engine
/// itself never parses them.
#[derive(Debug, Clone, Serialize, Deserialize, Setters)]
#[setters(strip_option, into)]
pub struct EngineConfig {
    /// Identifier of the backing collection the storage adapter is bound to
    pub collection_name: String,
    /// Maximum records claimed per batch
    pub batch_size: usize,
    /// Failed attempts allowed before a record becomes permanently failed
    pub retry_limit: u32,
    /// Age after which a record is deleted regardless of status
    pub max_record_age: Duration,
    /// Schedule expression for batch processing, consumed externally
    pub process_cron: Option<String>,
    /// Schedule expression for cleanup, consumed externally
    pub cleanup_cron: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collection_name: "deferred_work".to_string(),
            batch_size: 10,
            retry_limit: 3,
            max_record_age: Duration::from_secs(7 * 24 * 60 * 60),
            process_cron: None,
            cleanup_cron: None,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration, failing fast before any processing begins
    pub fn validate(&self) -> Result<()> {
        if self.collection_name.is_empty() {
            return Err(Error::config("collection_name must not be empty"));
        }
        if self.batch_size == 0 {
            return Err(Error::config("batch_size must be positive"));
        }
        if self.max_record_age.is_zero() {
            return Err(Error::config("max_record_age must be positive"));
        }
        Ok(())
    }
}
