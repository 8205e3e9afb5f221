use super::{ConfigurationError, ValueType};

/// Mapping definition for one entity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Attribute name in the store.
    pub attribute_name: String,
    /// Property name on the entity, as registered in its accessor table.
    pub property_name: String,
    /// Declared type, used to pick the decoding converter.
    pub value_type: ValueType,
    pub is_hash_key: bool,
    pub is_range_key: bool,
}

impl FieldDescriptor {
    /// Creates a plain text field stored under its own property name.
    pub fn new(property_name: impl Into<String>) -> Self {
        let property_name = property_name.into();
        Self {
            attribute_name: property_name.clone(),
            property_name,
            value_type: ValueType::Text,
            is_hash_key: false,
            is_range_key: false,
        }
    }

    pub fn hash_key(property_name: impl Into<String>) -> Self {
        Self {
            is_hash_key: true,
            ..Self::new(property_name)
        }
    }

    pub fn range_key(property_name: impl Into<String>) -> Self {
        Self {
            is_range_key: true,
            ..Self::new(property_name)
        }
    }

    /// Creates a field with an explicit key role.
    ///
    /// Fails when the field is asked to be both hash and range key.
    pub fn with_key_role(
        property_name: impl Into<String>,
        is_hash_key: bool,
        is_range_key: bool,
    ) -> Result<Self, ConfigurationError> {
        let property_name = property_name.into();
        if is_hash_key && is_range_key {
            return Err(ConfigurationError::DualKeyRole {
                property: property_name,
            });
        }

        Ok(Self {
            is_hash_key,
            is_range_key,
            ..Self::new(property_name)
        })
    }

    /// Overrides the declared type.
    pub fn of_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Stores the field under a different attribute name.
    pub fn map_to(mut self, attribute_name: impl Into<String>) -> Self {
        self.attribute_name = attribute_name.into();
        self
    }

    pub fn is_key(&self) -> bool {
        self.is_hash_key || self.is_range_key
    }

    pub fn is_valid(&self) -> bool {
        !self.attribute_name.is_empty()
            && !self.property_name.is_empty()
            && !(self.is_hash_key && self.is_range_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_defaults() {
        let field = FieldDescriptor::new("Title");

        assert_eq!(field.property_name, "Title");
        assert_eq!(field.attribute_name, "Title");
        assert_eq!(field.value_type, ValueType::Text);
        assert!(!field.is_hash_key);
        assert!(!field.is_range_key);
        assert!(field.is_valid());
    }

    #[test]
    fn test_with_key_role_hash_only() {
        let field = FieldDescriptor::with_key_role("Id", true, false).unwrap();

        assert!(field.is_hash_key);
        assert!(!field.is_range_key);
        assert_eq!(field.value_type, ValueType::Text);
    }

    #[test]
    fn test_with_key_role_rejects_dual_key_for_any_name() {
        for name in ["Id", "", "Sort", "a b c"] {
            let result = FieldDescriptor::with_key_role(name, true, true);
            assert_eq!(
                result,
                Err(ConfigurationError::DualKeyRole {
                    property: name.to_string()
                })
            );
        }
    }

    #[test]
    fn test_of_type_and_map_to() {
        let field = FieldDescriptor::new("CreatedOn")
            .of_type(ValueType::Timestamp)
            .map_to("created_on");

        assert_eq!(field.value_type, ValueType::Timestamp);
        assert_eq!(field.attribute_name, "created_on");
        assert_eq!(field.property_name, "CreatedOn");
    }

    #[test]
    fn test_is_valid_false_when_property_name_empty() {
        let field = FieldDescriptor::new("Title");
        let field = FieldDescriptor {
            property_name: String::new(),
            ..field
        };
        assert!(!field.is_valid());
    }

    #[test]
    fn test_is_valid_false_when_attribute_name_empty() {
        assert!(!FieldDescriptor::new("Title").map_to("").is_valid());
    }

    #[test]
    fn test_is_valid_false_when_both_key_flags_set() {
        let mut field = FieldDescriptor::hash_key("Id");
        field.is_range_key = true;
        assert!(!field.is_valid());
    }

    #[test]
    fn test_is_valid_for_every_key_role_combination() {
        for (hash, range) in [(false, false), (true, false), (false, true), (true, true)] {
            let field = FieldDescriptor {
                is_hash_key: hash,
                is_range_key: range,
                ..FieldDescriptor::new("Id")
            };
            assert_eq!(field.is_valid(), !(hash && range));
        }
    }
}
