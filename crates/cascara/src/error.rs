//! Error types for cascade operations
//!
//! Covers the two configuration failures detected before a cascade runs,
//! plus failures propagated from the underlying persistence layer while a
//! cascade is in flight.

use std::fmt;

/// Result type alias for cascade operations
pub type CascadeResult<T> = Result<T, CascadeError>;

/// Error types for cascade operations
#[derive(Debug, Clone)]
pub enum CascadeError {
    /// The model type declares cascade relationships but does not support soft deletes
    NotSoftDeletable { model: String },
    /// One or more declared cascade relationships do not resolve to a registered relation
    InvalidRelationships {
        model: String,
        relationships: Vec<String>,
    },
    /// Failure propagated from the persistence layer while deleting or restoring
    Database { message: String },
    /// Registry or hook misuse
    Configuration { message: String },
}

impl CascadeError {
    pub fn not_soft_deletable(model: &str) -> Self {
        Self::NotSoftDeletable {
            model: model.to_string(),
        }
    }

    pub fn invalid_relationships(model: &str, relationships: Vec<String>) -> Self {
        Self::InvalidRelationships {
            model: model.to_string(),
            relationships,
        }
    }

    pub fn database(message: &str) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    pub fn configuration(message: &str) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for CascadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeError::NotSoftDeletable { model } => {
                write!(f, "Model '{}' does not support soft deletes", model)
            }
            CascadeError::InvalidRelationships {
                model,
                relationships,
            } => {
                write!(
                    f,
                    "Invalid cascade relationships on model '{}': {}",
                    model,
                    relationships.join(", ")
                )
            }
            CascadeError::Database { message } => write!(f, "Database error: {}", message),
            CascadeError::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for CascadeError {}

// Convert from sqlx errors
impl From<sqlx::Error> for CascadeError {
    fn from(err: sqlx::Error) -> Self {
        CascadeError::database(&err.to_string())
    }
}

// Convert from anyhow errors
impl From<anyhow::Error> for CascadeError {
    fn from(err: anyhow::Error) -> Self {
        CascadeError::database(&err.to_string())
    }
}
