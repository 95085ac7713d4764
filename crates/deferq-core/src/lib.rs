//! # deferq-core
//!
//! This crate provides the foundational types and utilities for the deferq
//! persistent work queue. It defines the abstractions the storage and engine
//! crates build upon.
//!
//! ## Key Components
//!
//! - **Identifiers**: opaque unique ID generation and management
//! - **Errors**: common error taxonomy and handling

pub mod error;
pub mod id;

// Re-export commonly used types
pub use error::{Error, Result};
pub use id::{Id, generate_id_with_prefix};

/// Common type aliases for convenience
pub type DateTime = chrono::DateTime<chrono::Utc>;
pub type Json = serde_json::Value;
