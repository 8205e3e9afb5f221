//! Descriptor-driven repository.

use std::sync::Arc;

use async_trait::async_trait;

use dynamap_core::mapping::{
    ConfigurationError, Document, Entity, EntityMapper, KeySchema, PrimaryKey, Value, ValueType,
};
use dynamap_core::storage::{
    CreatePolicy, ItemStore, Repository, RepositoryError, Result, TableDescription,
    WriteCondition, WriteOutcome,
};

/// Repository for any entity type with an [`EntityMapper`].
///
/// All knowledge of the entity's shape comes from the mapper; the store only
/// sees documents and primary keys. A repository only exists once bound to
/// its table, see [`GenericRepository::bind`].
pub struct GenericRepository<E: Entity> {
    mapper: Arc<dyn EntityMapper<E>>,
    store: Arc<dyn ItemStore>,
    table_name: String,
    key_schema: KeySchema,
    create_policy: CreatePolicy,
}

impl<E: Entity> GenericRepository<E> {
    /// Binds a repository to the mapper's table.
    ///
    /// Fails if the mapper declares no hash key, if the table cannot be
    /// described, or if the table's key schema differs from the mapper's.
    /// Key attribute kinds are compared when the store reports them.
    pub async fn bind(
        mapper: Arc<dyn EntityMapper<E>>,
        store: Arc<dyn ItemStore>,
    ) -> Result<Self> {
        let table_name = mapper.table_name().to_string();
        let key_schema = mapper
            .key_schema()
            .ok_or_else(|| ConfigurationError::MissingHashKey {
                table: table_name.clone(),
            })?;

        let description = store.describe_table(&table_name).await?;
        if description.key_schema != key_schema {
            return Err(RepositoryError::KeySchemaMismatch {
                table: table_name,
                expected: key_schema,
                found: description.key_schema,
            });
        }
        check_key_kinds(mapper.as_ref(), &description)?;

        tracing::info!(
            entity = E::NAME,
            table = %table_name,
            key_schema = %key_schema,
            "Bound repository to table"
        );

        Ok(Self {
            mapper,
            store,
            table_name,
            key_schema,
            create_policy: CreatePolicy::default(),
        })
    }

    pub fn with_create_policy(mut self, policy: CreatePolicy) -> Self {
        self.create_policy = policy;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn key_schema(&self) -> &KeySchema {
        &self.key_schema
    }

    pub fn create_policy(&self) -> CreatePolicy {
        self.create_policy
    }

    /// Gets an entity by its full primary key.
    pub async fn find_by_key(&self, hash: Value, range: Option<Value>) -> Result<Option<E>> {
        let key = self.mapper.key_for(hash, range)?;
        self.find(&key).await
    }

    /// Deletes an entity by its full primary key, returning the removed value.
    pub async fn delete_by_key(&self, hash: Value, range: Option<Value>) -> Result<Option<E>> {
        let key = self.mapper.key_for(hash, range)?;
        self.remove(&key).await
    }

    async fn find(&self, key: &PrimaryKey) -> Result<Option<E>> {
        let document = self.store.get_item(&self.table_name, key).await?;
        tracing::debug!(
            entity = E::NAME,
            key = %key,
            found = document.is_some(),
            "Fetched item"
        );

        match document {
            Some(document) => Ok(Some(self.mapper.deserialize(&document)?)),
            None => Ok(None),
        }
    }

    async fn remove(&self, key: &PrimaryKey) -> Result<Option<E>> {
        let removed = self.store.delete_item(&self.table_name, key).await?;
        tracing::debug!(
            entity = E::NAME,
            key = %key,
            removed = removed.is_some(),
            "Deleted item"
        );

        let Some(document) = removed else {
            return Ok(None);
        };
        match self.mapper.deserialize(&document) {
            Ok(entity) => Ok(Some(entity)),
            Err(error) => {
                // The item is gone; the log is the only remaining copy
                tracing::warn!(
                    entity = E::NAME,
                    key = %key,
                    item = ?document,
                    %error,
                    "Deleted item could not be mapped"
                );
                Err(error.into())
            }
        }
    }

    async fn put(
        &self,
        entity: &E,
        condition: WriteCondition,
    ) -> Result<(PrimaryKey, Document, WriteOutcome)> {
        let document = self.mapper.serialize(entity)?;
        let key = self.mapper.key_of(entity)?;
        let outcome = self
            .store
            .put_item(&self.table_name, &key, document.clone(), condition)
            .await?;
        Ok((key, document, outcome))
    }
}

/// Rejects key attributes the table declares with a different kind than the
/// mapper writes.
fn check_key_kinds<E: Entity>(
    mapper: &dyn EntityMapper<E>,
    description: &TableDescription,
) -> Result<()> {
    let schema = &description.key_schema;
    let names = std::iter::once(schema.hash_key.as_str()).chain(schema.range_key.as_deref());

    for name in names {
        let Some(found) = description.key_kind(name) else {
            continue;
        };
        let Some(expected) = mapper.attribute_type(name).map(ValueType::stored_kind) else {
            continue;
        };
        if expected != found {
            return Err(RepositoryError::KeyTypeMismatch {
                table: description.table_name.clone(),
                attribute: name.to_string(),
                expected,
                found,
            });
        }
    }
    Ok(())
}

#[async_trait]
impl<E: Entity> Repository<E> for GenericRepository<E> {
    async fn create(&self, entity: &E) -> Result<()> {
        let (key, _, outcome) = self
            .put(entity, self.create_policy.write_condition())
            .await?;

        match outcome {
            WriteOutcome::Written => {
                tracing::debug!(entity = E::NAME, key = %key, "Created item");
                Ok(())
            }
            WriteOutcome::ConditionFailed => Err(RepositoryError::AlreadyExists {
                entity_type: E::NAME,
                id: key.to_string(),
            }),
        }
    }

    async fn find_by_id(&self, id: Value) -> Result<Option<E>> {
        let key = self.mapper.key_for(id, None)?;
        self.find(&key).await
    }

    async fn save(&self, entity: &E) -> Result<E> {
        let (key, document, outcome) = self.put(entity, WriteCondition::KeyPresent).await?;

        match outcome {
            WriteOutcome::Written => {
                tracing::debug!(entity = E::NAME, key = %key, "Saved item");
                Ok(self.mapper.deserialize(&document)?)
            }
            WriteOutcome::ConditionFailed => Err(RepositoryError::NotFound {
                entity_type: E::NAME,
                id: key.to_string(),
            }),
        }
    }

    async fn delete(&self, id: Value) -> Result<Option<E>> {
        let key = self.mapper.key_for(id, None)?;
        self.remove(&key).await
    }
}
