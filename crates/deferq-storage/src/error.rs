use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Query error: {message}")]
    Query { message: String },

    #[error("Conflict error: {message}")]
    Conflict { message: String },
}

impl StorageError {
    /// Create a query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
