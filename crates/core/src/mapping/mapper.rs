use std::sync::Arc;

use super::{
    AttributeValue, ConfigurationError, ConversionRegistry, Document, Entity, EntityDescriptor,
    FieldDescriptor, KeySchema, MappingError, MissingAttributePolicy, PrimaryKey,
    PropertyAccessor, Value, ValueType,
};

/// Converts between entities of type `E` and store documents.
///
/// Repositories only talk to the store through this seam, so a hand-written
/// mapper can replace [`GenericEntityMapper`] for a specific entity.
pub trait EntityMapper<E: Entity>: Send + Sync {
    /// Table the entity is stored in.
    fn table_name(&self) -> &str;

    /// Key attribute names, or `None` if no hash key is configured.
    fn key_schema(&self) -> Option<KeySchema>;

    /// Declared type of the field stored under `attribute`.
    fn attribute_type(&self, attribute: &str) -> Option<ValueType>;

    fn serialize(&self, entity: &E) -> Result<Document, MappingError>;

    fn deserialize(&self, document: &Document) -> Result<E, MappingError>;

    /// Builds a primary key from typed key values.
    fn key_for(&self, hash: Value, range: Option<Value>) -> Result<PrimaryKey, MappingError>;

    /// Reads the primary key off an entity.
    fn key_of(&self, entity: &E) -> Result<PrimaryKey, MappingError>;
}

/// Descriptor-driven [`EntityMapper`].
pub struct GenericEntityMapper<E: Entity> {
    descriptor: Arc<EntityDescriptor<E>>,
    // Parallel to `descriptor.fields()`.
    accessors: Vec<PropertyAccessor<E>>,
    registry: ConversionRegistry,
}

impl<E: Entity> GenericEntityMapper<E> {
    /// Creates a mapper, resolving every field's accessor up front.
    ///
    /// Fails if a configured property has no accessor. An otherwise invalid
    /// descriptor is accepted with a warning.
    pub fn new(descriptor: Arc<EntityDescriptor<E>>) -> Result<Self, ConfigurationError> {
        let accessors = descriptor
            .fields()
            .iter()
            .map(|field| {
                descriptor.accessors().get(&field.property_name).ok_or_else(|| {
                    ConfigurationError::MissingAccessor {
                        entity: E::NAME,
                        property: field.property_name.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !descriptor.is_valid() {
            tracing::warn!(
                entity = E::NAME,
                table = descriptor.table_name(),
                "Entity descriptor is not valid"
            );
        }

        Ok(Self {
            descriptor,
            accessors,
            registry: ConversionRegistry::default(),
        })
    }

    pub fn with_missing_attribute_policy(mut self, policy: MissingAttributePolicy) -> Self {
        self.registry = ConversionRegistry::new(policy);
        self
    }

    pub fn descriptor(&self) -> &EntityDescriptor<E> {
        &self.descriptor
    }

    pub fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &PropertyAccessor<E>)> {
        self.descriptor.fields().iter().zip(&self.accessors)
    }

    fn key_attribute(
        field: &FieldDescriptor,
        value: Value,
    ) -> Result<AttributeValue, MappingError> {
        if value.value_type() != field.value_type {
            return Err(MappingError::UnexpectedValue {
                property: field.property_name.clone(),
                expected: field.value_type,
                found: value.value_type(),
            });
        }
        Ok(value.into())
    }

    fn read(
        field: &FieldDescriptor,
        accessor: &PropertyAccessor<E>,
        entity: &E,
    ) -> Result<Value, MappingError> {
        let value = (accessor.get)(entity);
        if value.value_type() != field.value_type {
            return Err(MappingError::UnexpectedValue {
                property: field.property_name.clone(),
                expected: field.value_type,
                found: value.value_type(),
            });
        }
        Ok(value)
    }
}

impl<E: Entity> EntityMapper<E> for GenericEntityMapper<E> {
    fn table_name(&self) -> &str {
        self.descriptor.table_name()
    }

    fn key_schema(&self) -> Option<KeySchema> {
        let hash = self.descriptor.hash_key()?;
        let range = self
            .descriptor
            .range_key()
            .map(|field| field.attribute_name.clone());
        Some(KeySchema::new(hash.attribute_name.clone(), range))
    }

    fn attribute_type(&self, attribute: &str) -> Option<ValueType> {
        self.descriptor
            .fields()
            .iter()
            .find(|field| field.attribute_name == attribute)
            .map(|field| field.value_type)
    }

    fn serialize(&self, entity: &E) -> Result<Document, MappingError> {
        let mut document = Document::new();

        for (field, accessor) in self.fields() {
            let value = Self::read(field, accessor, entity)?;
            document.insert(field.attribute_name.clone(), value.into());
        }

        tracing::trace!(
            entity = E::NAME,
            attributes = document.len(),
            "Serialized entity"
        );
        Ok(document)
    }

    fn deserialize(&self, document: &Document) -> Result<E, MappingError> {
        let mut entity = E::default();

        for (field, accessor) in self.fields() {
            let value = self.registry.convert(
                &field.attribute_name,
                field.value_type,
                document.get(&field.attribute_name),
            )?;
            (accessor.set)(&mut entity, value).map_err(|e| MappingError::UnexpectedValue {
                property: field.property_name.clone(),
                expected: e.expected,
                found: e.found,
            })?;
        }

        tracing::trace!(
            entity = E::NAME,
            attributes = document.len(),
            "Deserialized entity"
        );
        Ok(entity)
    }

    fn key_for(&self, hash: Value, range: Option<Value>) -> Result<PrimaryKey, MappingError> {
        let hash_field =
            self.descriptor
                .hash_key()
                .ok_or_else(|| MappingError::MissingKeyDefinition {
                    table: self.table_name().to_string(),
                })?;
        let key = PrimaryKey::new(
            hash_field.attribute_name.clone(),
            Self::key_attribute(hash_field, hash)?,
        );

        match (self.descriptor.range_key(), range) {
            (Some(range_field), Some(range)) => Ok(key.with_range(
                range_field.attribute_name.clone(),
                Self::key_attribute(range_field, range)?,
            )),
            (Some(range_field), None) => Err(MappingError::IncompleteKey {
                attribute: range_field.attribute_name.clone(),
            }),
            (None, Some(_)) => Err(MappingError::UnexpectedRangeKey {
                table: self.table_name().to_string(),
            }),
            (None, None) => Ok(key),
        }
    }

    fn key_of(&self, entity: &E) -> Result<PrimaryKey, MappingError> {
        let value_of = |field: &FieldDescriptor| -> Result<Value, MappingError> {
            let accessor = self
                .descriptor
                .accessors()
                .get(&field.property_name)
                .ok_or_else(|| MappingError::IncompleteKey {
                    attribute: field.attribute_name.clone(),
                })?;
            Self::read(field, &accessor, entity)
        };

        let hash_field =
            self.descriptor
                .hash_key()
                .ok_or_else(|| MappingError::MissingKeyDefinition {
                    table: self.table_name().to_string(),
                })?;
        let hash = value_of(hash_field)?;
        let range = self.descriptor.range_key().map(value_of).transpose()?;

        self.key_for(hash, range)
    }
}
