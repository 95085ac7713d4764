use crate::document::{Document, Filter, FindOptions, Update};
use crate::Result;
use async_trait::async_trait;

/// Narrow interface over a document store.
///
/// One adapter instance is bound to one collection; connection pooling,
/// authentication, and retries are the backing store's concern. The single
/// contract substitute backends must preserve is that `update_one` evaluates
/// its filter and applies its patch atomically, so a conditional update keyed
/// on an expected field value can stand in for a transactional lock.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Insert a document, returning its `id` field
    async fn insert(&self, document: Document) -> Result<String>;

    /// Find documents matching a filter
    async fn find_many(&self, filter: &Filter, options: FindOptions) -> Result<Vec<Document>>;

    /// Atomically update the first document matching a filter, returning the
    /// matched count (0 or 1)
    async fn update_one(&self, filter: &Filter, update: &Update) -> Result<u64>;

    /// Delete all documents matching a filter, returning the deleted count
    async fn delete_many(&self, filter: &Filter) -> Result<u64>;

    /// Count documents matching a filter
    async fn count(&self, filter: &Filter) -> Result<u64>;
}
