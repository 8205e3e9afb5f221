use thiserror::Error;

use super::ValueType;

/// Errors raised while building or checking an entity mapping.
///
/// These indicate drift between an entity type and its descriptor and are
/// always fatal to the operation that surfaced them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Field '{property}' cannot be both hash key and range key")]
    DualKeyRole { property: String },
    #[error("Invalid field configuration for property '{property}'")]
    InvalidField { property: String },
    #[error("No accessor registered for property '{property}' on {entity}")]
    MissingAccessor {
        entity: &'static str,
        property: String,
    },
    #[error("Table '{table}' has no hash key configured")]
    MissingHashKey { table: String },
}

/// Errors raised while converting between entities and documents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Missing attribute: {attribute}")]
    MissingAttribute { attribute: String },
    #[error("Attribute '{attribute}' expected {expected}, found {found}")]
    TypeMismatch {
        attribute: String,
        expected: ValueType,
        found: &'static str,
    },
    #[error("Attribute '{attribute}' is not a valid {expected}: {reason}")]
    InvalidValue {
        attribute: String,
        expected: ValueType,
        reason: String,
    },
    #[error("Property '{property}' expected {expected}, got {found}")]
    UnexpectedValue {
        property: String,
        expected: ValueType,
        found: ValueType,
    },
    #[error("Key attribute '{attribute}' is required")]
    IncompleteKey { attribute: String },
    #[error("Table '{table}' declares no hash key")]
    MissingKeyDefinition { table: String },
    #[error("Table '{table}' declares no range key")]
    UnexpectedRangeKey { table: String },
    #[error("Unsupported attribute kind for '{attribute}': {kind}")]
    UnsupportedAttribute { attribute: String, kind: String },
}
