//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `ItemStore` trait
//! defined in `dynamap_core::storage`. Backends are selected at compile time
//! via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): process-local tables behind `Arc<RwLock<_>>`
//! - `dynamodb`: AWS DynamoDB backend using `aws-sdk-dynamodb`
//!
//! Both may be enabled at once; the binary then picks one with `--backend`.
//!
//! # Examples
//!
//! Build with DynamoDB support:
//! ```bash
//! cargo build -p dynamap --features dynamodb
//! ```

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p dynamap --features dynamodb"
);

use dynamap_core::mapping::{Document, PrimaryKey};
use dynamap_core::storage::{RepositoryError, Result};

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;

/// Rejects an item that does not carry the key it is written under.
pub(crate) fn check_item_key(key: &PrimaryKey, item: &Document) -> Result<()> {
    if key.is_carried_by(item) {
        Ok(())
    } else {
        Err(RepositoryError::QueryFailed(format!(
            "Item does not carry key {}",
            key
        )))
    }
}

#[cfg(test)]
mod tests {
    use dynamap_core::mapping::AttributeValue;

    use super::*;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    #[test]
    fn test_check_item_key() {
        let key = PrimaryKey::new("Id", s("abc"));
        let mut item = Document::new();
        item.insert("Id", s("abc"));
        item.insert("Title", s("Sample"));

        assert_eq!(check_item_key(&key, &item), Ok(()));
    }

    #[test]
    fn test_check_item_key_rejects_missing_range() {
        let key = PrimaryKey::new("Id", s("abc")).with_range("Version", s("2"));
        let mut item = Document::new();
        item.insert("Id", s("abc"));

        assert_eq!(
            check_item_key(&key, &item),
            Err(RepositoryError::QueryFailed(
                "Item does not carry key Id=abc, Version=2".to_string()
            ))
        );
    }
}
