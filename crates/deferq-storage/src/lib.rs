//! # deferq-storage
//!
//! This crate provides the storage abstraction the deferq engine runs on: a
//! narrow document-store interface plus the opaque filter and patch types the
//! engine expresses its queries with.
//!
//! ## Features
//!
//! - `StorageAdapter` trait: insert, find, conditional update, delete, count
//! - Backend-neutral `Filter` / `Update` / `FindOptions` query types
//! - In-memory reference backend with atomic conditional updates

pub mod document;
pub mod error;
pub mod memory;
pub mod traits;

pub use document::{Comparison, Document, Filter, FindOptions, SortOrder, Update};
pub use error::{Result, StorageError};
pub use memory::MemoryStorage;
pub use traits::StorageAdapter;
