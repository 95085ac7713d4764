use thiserror::Error;

/// Core error types for the deferq work queue
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Processing error: {message}")]
    Processing { message: String },

    #[error("Notification error: {message}")]
    Notification { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Generic error: {message}")]
    Generic { message: String },
}

impl Error {
    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new processing error
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing {
            message: message.into(),
        }
    }

    /// Create a new notification error
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
