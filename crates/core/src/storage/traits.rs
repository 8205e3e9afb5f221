use async_trait::async_trait;

use crate::mapping::{Document, Entity, PrimaryKey, Value};

use super::{RepositoryError, Result, TableDescription, WriteCondition, WriteOutcome};

/// Item-level access to a key-value document store.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Describes a table, failing with `TableNotFound` if it does not exist.
    async fn describe_table(&self, table: &str) -> Result<TableDescription>;

    /// Writes a whole item if `condition` holds for its key.
    async fn put_item(
        &self,
        table: &str,
        key: &PrimaryKey,
        item: Document,
        condition: WriteCondition,
    ) -> Result<WriteOutcome>;

    /// Gets an item by its primary key.
    async fn get_item(&self, table: &str, key: &PrimaryKey) -> Result<Option<Document>>;

    /// Deletes an item, returning what was stored under the key.
    async fn delete_item(&self, table: &str, key: &PrimaryKey) -> Result<Option<Document>>;
}

/// Persistence operations for one entity type, keyed by `K`.
#[async_trait]
pub trait Repository<E: Entity, K: Send + 'static = Value>: Send + Sync {
    /// Writes a new entity.
    async fn create(&self, entity: &E) -> Result<()>;

    /// Gets an entity by its hash key, `None` if absent.
    async fn find_by_id(&self, id: K) -> Result<Option<E>>;

    /// Replaces an existing entity and returns it as stored.
    async fn save(&self, _entity: &E) -> Result<E> {
        Err(RepositoryError::NotImplemented {
            operation: "save",
            entity_type: E::NAME,
        })
    }

    /// Deletes an entity, returning the removed value.
    async fn delete(&self, _id: K) -> Result<Option<E>> {
        Err(RepositoryError::NotImplemented {
            operation: "delete",
            entity_type: E::NAME,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::mapping::AccessorTable;

    #[derive(Debug, Default, PartialEq)]
    struct Note;

    impl Entity for Note {
        const NAME: &'static str = "Note";

        fn accessors() -> AccessorTable<Self> {
            AccessorTable::new()
        }
    }

    /// Counts every call that would reach a store.
    #[derive(Default)]
    struct CreateOnlyRepository {
        store_calls: AtomicUsize,
    }

    #[async_trait]
    impl Repository<Note> for CreateOnlyRepository {
        async fn create(&self, _entity: &Note) -> Result<()> {
            self.store_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn find_by_id(&self, _id: Value) -> Result<Option<Note>> {
            self.store_calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_default_save_is_not_implemented() {
        let repo = CreateOnlyRepository::default();

        let result = repo.save(&Note).await;

        assert_eq!(
            result,
            Err(RepositoryError::NotImplemented {
                operation: "save",
                entity_type: "Note",
            })
        );
        assert_eq!(repo.store_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_default_delete_is_not_implemented() {
        let repo = CreateOnlyRepository::default();

        for _ in 0..3 {
            let result = repo.delete(Value::from("abc")).await;
            assert_eq!(
                result,
                Err(RepositoryError::NotImplemented {
                    operation: "delete",
                    entity_type: "Note",
                })
            );
        }
        assert_eq!(repo.store_calls.load(Ordering::SeqCst), 0);
    }
}
