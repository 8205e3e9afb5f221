use std::time::Duration;

use thiserror::Error;

use crate::mapping::{ConfigurationError, KeySchema, MappingError};

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Key schema mismatch on table '{table}': expected {expected}, found {found}")]
    KeySchemaMismatch {
        table: String,
        expected: KeySchema,
        found: KeySchema,
    },
    #[error(
        "Key attribute '{attribute}' on table '{table}' is declared {found}, \
         but the entity writes it as {expected}"
    )]
    KeyTypeMismatch {
        table: String,
        attribute: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),
    #[error("{operation} is not implemented for {entity_type}")]
    NotImplemented {
        operation: &'static str,
        entity_type: &'static str,
    },
    #[error("{operation} timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },
    #[error("{operation} was cancelled")]
    Cancelled { operation: &'static str },
}

impl RepositoryError {
    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RepositoryError::ConnectionFailed(_) | RepositoryError::Timeout { .. }
        )
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
