//! In-memory item store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dynamap_core::mapping::{Document, KeySchema, PrimaryKey};
use dynamap_core::storage::{
    ItemStore, RepositoryError, Result, TableDescription, WriteCondition, WriteOutcome,
};

use crate::storage::check_item_key;

#[derive(Debug)]
struct Table {
    key_schema: KeySchema,
    items: HashMap<PrimaryKey, Document>,
}

impl Table {
    fn new(key_schema: KeySchema) -> Self {
        Self {
            key_schema,
            items: HashMap::new(),
        }
    }

    /// Rejects keys whose attribute names differ from the table's schema.
    fn check_key(&self, table: &str, key: &PrimaryKey) -> Result<()> {
        let range_name = key.range.as_ref().map(|r| r.name.as_str());
        if key.hash.name != self.key_schema.hash_key
            || range_name != self.key_schema.range_key.as_deref()
        {
            return Err(RepositoryError::QueryFailed(format!(
                "Key {} does not match the schema of table {}: {}",
                key, table, self.key_schema
            )));
        }
        Ok(())
    }
}

/// In-memory storage backend for testing.
///
/// Tables live in a `HashMap` wrapped in `Arc<RwLock<_>>`. Every operation
/// takes the lock once, so conditional writes are atomic. Data is not
/// persisted and will be lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryStore {
    /// Creates a store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given empty tables.
    pub fn with_tables(tables: impl IntoIterator<Item = (String, KeySchema)>) -> Self {
        let tables = tables
            .into_iter()
            .map(|(name, key_schema)| (name, Table::new(key_schema)))
            .collect();
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Creates an empty table, failing if it already exists.
    pub async fn create_table(&self, name: impl Into<String>, key_schema: KeySchema) -> Result<()> {
        let name = name.into();
        let mut tables = self.tables.write().await;
        if tables.contains_key(&name) {
            return Err(RepositoryError::QueryFailed(format!(
                "Table already exists: {}",
                name
            )));
        }
        tracing::debug!(table = %name, key_schema = %key_schema, "Created in-memory table");
        tables.insert(name, Table::new(key_schema));
        Ok(())
    }

    /// Number of items in a table, or `None` if it does not exist.
    pub async fn item_count(&self, table: &str) -> Option<usize> {
        let tables = self.tables.read().await;
        tables.get(table).map(|t| t.items.len())
    }
}

fn table_not_found(table: &str) -> RepositoryError {
    RepositoryError::TableNotFound(table.to_string())
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn describe_table(&self, table: &str) -> Result<TableDescription> {
        let tables = self.tables.read().await;
        let found = tables.get(table).ok_or_else(|| table_not_found(table))?;
        Ok(TableDescription::new(table, found.key_schema.clone()))
    }

    async fn put_item(
        &self,
        table: &str,
        key: &PrimaryKey,
        item: Document,
        condition: WriteCondition,
    ) -> Result<WriteOutcome> {
        let mut tables = self.tables.write().await;
        let found = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        found.check_key(table, key)?;

        check_item_key(key, &item)?;

        if !condition.holds(found.items.contains_key(key)) {
            return Ok(WriteOutcome::ConditionFailed);
        }

        found.items.insert(key.clone(), item);
        Ok(WriteOutcome::Written)
    }

    async fn get_item(&self, table: &str, key: &PrimaryKey) -> Result<Option<Document>> {
        let tables = self.tables.read().await;
        let found = tables.get(table).ok_or_else(|| table_not_found(table))?;
        found.check_key(table, key)?;
        Ok(found.items.get(key).cloned())
    }

    async fn delete_item(&self, table: &str, key: &PrimaryKey) -> Result<Option<Document>> {
        let mut tables = self.tables.write().await;
        let found = tables.get_mut(table).ok_or_else(|| table_not_found(table))?;
        found.check_key(table, key)?;
        Ok(found.items.remove(key))
    }
}
