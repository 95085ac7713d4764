use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque unique identifier type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id(String);

impl Id {
    /// Create a new ID from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation of the ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generate a new unique ID with a prefix
pub fn generate_id_with_prefix(prefix: &str) -> Id {
    Id(format!("{}_{}", prefix, uuid::Uuid::new_v4()))
}
