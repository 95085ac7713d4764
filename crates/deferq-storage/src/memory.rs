//! In-memory storage backend
//!
//! Reference implementation of [`StorageAdapter`] backed by a shared vector
//! under a `tokio::sync::RwLock`. All mutations run under the write lock, so
//! `update_one` is atomic and the conditional-update-as-lock contract holds.
//! Clones share the same backing collection, which lets tests point several
//! engine instances at one document set.

use crate::document::{compare_values, Document, Filter, FindOptions, SortOrder, Update};
use crate::traits::StorageAdapter;
use crate::{Result, StorageError};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shared in-memory document collection
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl MemoryStorage {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the collection is empty
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn insert(&self, document: Document) -> Result<String> {
        let id = document
            .get("id")
            .and_then(|value| value.as_str())
            .ok_or_else(|| StorageError::query("document is missing a string 'id' field"))?
            .to_string();

        let mut documents = self.documents.write().await;
        if documents
            .iter()
            .any(|existing| existing.get("id").and_then(|v| v.as_str()) == Some(id.as_str()))
        {
            return Err(StorageError::conflict(format!("duplicate id {id}")));
        }

        documents.push(document);
        debug!("Inserted document {}", id);
        Ok(id)
    }

    async fn find_many(&self, filter: &Filter, options: FindOptions) -> Result<Vec<Document>> {
        let documents = self.documents.read().await;

        let mut matched: Vec<Document> = documents
            .iter()
            .filter(|document| filter.matches(document))
            .cloned()
            .collect();

        if let Some((field, order)) = &options.sort {
            matched.sort_by(|a, b| {
                let ordering = match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = options.limit {
            matched.truncate(limit);
        }

        Ok(matched)
    }

    async fn update_one(&self, filter: &Filter, update: &Update) -> Result<u64> {
        let mut documents = self.documents.write().await;

        match documents.iter_mut().find(|document| filter.matches(document)) {
            Some(document) => {
                update.apply(document);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, filter: &Filter) -> Result<u64> {
        let mut documents = self.documents.write().await;
        let before = documents.len();

        documents.retain(|document| !filter.matches(document));

        let removed = (before - documents.len()) as u64;
        debug!("Deleted {} documents", removed);
        Ok(removed)
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|document| filter.matches(document)).count() as u64)
    }
}
