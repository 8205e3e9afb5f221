use std::fmt;
use std::ops::Deref;

use super::{AccessorTable, ConfigurationError, FieldDescriptor, ValueType};

/// An application record that can be mapped to a document.
///
/// Entities must be default-constructible: deserialization starts from
/// `Self::default()` and assigns every mapped property in turn.
pub trait Entity: Default + Send + Sync + 'static {
    /// Name used in errors and logs.
    const NAME: &'static str;

    /// Getter/setter pairs for every property that may be mapped.
    fn accessors() -> AccessorTable<Self>;
}

/// Table, field and key mapping for one entity type.
///
/// Built once at start-up through the fluent methods below, then shared
/// read-only by mappers and repositories.
///
/// ```
/// use dynamap_core::mapping::{AccessorTable, Entity, EntityDescriptor, Value, ValueType};
/// use uuid::Uuid;
///
/// #[derive(Default)]
/// struct Note {
///     id: Uuid,
/// }
///
/// impl Entity for Note {
///     const NAME: &'static str = "Note";
///
///     fn accessors() -> AccessorTable<Self> {
///         AccessorTable::<Self>::new().property(
///             "Id",
///             |note| Value::from(note.id),
///             |note, value| {
///                 note.id = value.try_into()?;
///                 Ok(())
///             },
///         )
///     }
/// }
///
/// let mut descriptor = EntityDescriptor::<Note>::new();
/// descriptor
///     .to_table("Notes")
///     .has_hash_key("Id")
///     .of_type(ValueType::Identifier);
///
/// assert!(descriptor.is_valid());
/// ```
pub struct EntityDescriptor<E: Entity> {
    table_name: String,
    fields: Vec<FieldDescriptor>,
    hash_key: Option<usize>,
    range_key: Option<usize>,
    accessors: AccessorTable<E>,
}

impl<E: Entity> Default for EntityDescriptor<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityDescriptor<E> {
    /// Creates an empty descriptor using the entity's own accessor table.
    pub fn new() -> Self {
        Self::with_accessors(E::accessors())
    }

    /// Creates an empty descriptor with an explicit accessor table.
    pub fn with_accessors(accessors: AccessorTable<E>) -> Self {
        Self {
            table_name: String::new(),
            fields: Vec::new(),
            hash_key: None,
            range_key: None,
            accessors,
        }
    }

    pub fn to_table(&mut self, table_name: impl Into<String>) -> &mut Self {
        self.table_name = table_name.into();
        self
    }

    pub fn has_hash_key(&mut self, property_name: impl Into<String>) -> FieldRef<'_> {
        let index = self.push_field(FieldDescriptor::hash_key(property_name));
        FieldRef(&mut self.fields[index])
    }

    pub fn has_range_key(&mut self, property_name: impl Into<String>) -> FieldRef<'_> {
        let index = self.push_field(FieldDescriptor::range_key(property_name));
        FieldRef(&mut self.fields[index])
    }

    pub fn has_field(&mut self, property_name: impl Into<String>) -> FieldRef<'_> {
        let index = self.push_field(FieldDescriptor::new(property_name));
        FieldRef(&mut self.fields[index])
    }

    /// Appends a pre-built field.
    pub fn add_field(
        &mut self,
        field: FieldDescriptor,
    ) -> Result<FieldRef<'_>, ConfigurationError> {
        if field.is_hash_key && field.is_range_key {
            return Err(ConfigurationError::DualKeyRole {
                property: field.property_name,
            });
        }
        let index = self.push_field(field);
        Ok(FieldRef(&mut self.fields[index]))
    }

    /// Appends a batch of pre-built fields.
    ///
    /// Every field is checked before any is appended, so a failing batch
    /// leaves the descriptor untouched.
    pub fn has_fields(
        &mut self,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<&mut Self, ConfigurationError> {
        let fields: Vec<FieldDescriptor> = fields.into_iter().collect();

        for field in &fields {
            if field.is_hash_key && field.is_range_key {
                return Err(ConfigurationError::DualKeyRole {
                    property: field.property_name.clone(),
                });
            }
            if !field.is_valid() {
                return Err(ConfigurationError::InvalidField {
                    property: field.property_name.clone(),
                });
            }
        }

        for field in fields {
            self.push_field(field);
        }

        Ok(self)
    }

    /// Recomputed on every call. Advisory: nothing refuses an invalid
    /// descriptor except operations that cannot work without a hash key.
    pub fn is_valid(&self) -> bool {
        !self.table_name.is_empty()
            && self.hash_key.is_some()
            && self.fields.iter().all(FieldDescriptor::is_valid)
    }

    /// Checks that every configured property has an accessor.
    pub fn check_accessors(&self) -> Result<(), ConfigurationError> {
        match self
            .fields
            .iter()
            .find(|field| !self.accessors.contains(&field.property_name))
        {
            Some(field) => Err(ConfigurationError::MissingAccessor {
                entity: E::NAME,
                property: field.property_name.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn hash_key(&self) -> Option<&FieldDescriptor> {
        self.hash_key.map(|index| &self.fields[index])
    }

    pub fn range_key(&self) -> Option<&FieldDescriptor> {
        self.range_key.map(|index| &self.fields[index])
    }

    pub fn accessors(&self) -> &AccessorTable<E> {
        &self.accessors
    }

    pub fn field(&self, property_name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|field| field.property_name == property_name)
    }

    /// Appends a field and re-points the key references. A newer hash or
    /// range key demotes the previous one to a plain field.
    fn push_field(&mut self, field: FieldDescriptor) -> usize {
        let index = self.fields.len();
        let (is_hash_key, is_range_key) = (field.is_hash_key, field.is_range_key);
        self.fields.push(field);

        if is_hash_key {
            if let Some(previous) = self.hash_key.replace(index) {
                self.fields[previous].is_hash_key = false;
            }
        }
        if is_range_key {
            if let Some(previous) = self.range_key.replace(index) {
                self.fields[previous].is_range_key = false;
            }
        }

        index
    }
}

impl<E: Entity> fmt::Debug for EntityDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("entity", &E::NAME)
            .field("table_name", &self.table_name)
            .field("fields", &self.fields)
            .field("hash_key", &self.hash_key())
            .field("range_key", &self.range_key())
            .finish()
    }
}

/// Handle to a field just attached to an [`EntityDescriptor`].
///
/// Returned by the `has_*` builder calls so type and attribute-name
/// refinements chain on the new field rather than on the descriptor.
pub struct FieldRef<'a>(&'a mut FieldDescriptor);

impl FieldRef<'_> {
    pub fn of_type(self, value_type: ValueType) -> Self {
        self.0.value_type = value_type;
        self
    }

    pub fn map_to(self, attribute_name: impl Into<String>) -> Self {
        self.0.attribute_name = attribute_name.into();
        self
    }
}

impl Deref for FieldRef<'_> {
    type Target = FieldDescriptor;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}
