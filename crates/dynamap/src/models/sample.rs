use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use dynamap_core::mapping::{
    AccessorTable, ConfigurationError, Entity, EntityDescriptor, FieldDescriptor, Value,
    ValueType,
};

/// The record the demo stores in `TestTable`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub price: Decimal,
    pub tags: Vec<String>,
}

impl SampleEntity {
    /// Creates a new entity with a random id, stamped now.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            created_on: Utc::now(),
            updated_on: DateTime::<Utc>::UNIX_EPOCH,
            price,
            tags,
        }
    }

    pub fn demo() -> Self {
        Self::new(
            "Sample Record 001",
            "Senectus eros. Sit sodales sem. Semper senectus elit aliquam vulputate. \
             Inceptos Velit adipiscing tincidunt et vulputate a inceptos phasellus pretium",
            Decimal::new(24184, 2),
            vec![
                "Senectus".to_string(),
                "Semper".to_string(),
                "Inceptos".to_string(),
            ],
        )
    }
}

impl Entity for SampleEntity {
    const NAME: &'static str = "SampleEntity";

    fn accessors() -> AccessorTable<Self> {
        AccessorTable::<Self>::new()
            .property(
                "Id",
                |e| Value::from(e.id),
                |e, v| {
                    e.id = v.try_into()?;
                    Ok(())
                },
            )
            .property(
                "Title",
                |e| Value::from(e.title.clone()),
                |e, v| {
                    e.title = v.try_into()?;
                    Ok(())
                },
            )
            .property(
                "Description",
                |e| Value::from(e.description.clone()),
                |e, v| {
                    e.description = v.try_into()?;
                    Ok(())
                },
            )
            .property(
                "CreatedOn",
                |e| Value::from(e.created_on),
                |e, v| {
                    e.created_on = v.try_into()?;
                    Ok(())
                },
            )
            .property(
                "UpdatedOn",
                |e| Value::from(e.updated_on),
                |e, v| {
                    e.updated_on = v.try_into()?;
                    Ok(())
                },
            )
            .property(
                "Price",
                |e| Value::from(e.price),
                |e, v| {
                    e.price = v.try_into()?;
                    Ok(())
                },
            )
            .property(
                "Tags",
                |e| Value::from(e.tags.clone()),
                |e, v| {
                    e.tags = v.try_into()?;
                    Ok(())
                },
            )
    }
}

/// Maps [`SampleEntity`] to `table_name`, keyed by `Id`.
pub fn sample_descriptor(
    table_name: &str,
) -> Result<EntityDescriptor<SampleEntity>, ConfigurationError> {
    let mut descriptor = EntityDescriptor::new();
    descriptor.to_table(table_name).has_fields([
        FieldDescriptor::new("Title"),
        FieldDescriptor::new("Description"),
        FieldDescriptor::new("CreatedOn").of_type(ValueType::Timestamp),
        FieldDescriptor::new("UpdatedOn").of_type(ValueType::Timestamp),
        FieldDescriptor::new("Price").of_type(ValueType::Decimal),
        FieldDescriptor::new("Tags").of_type(ValueType::TextList),
    ])?;
    descriptor.has_hash_key("Id").of_type(ValueType::Identifier);

    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_descriptor_is_valid() {
        let descriptor = sample_descriptor("TestTable").unwrap();

        assert!(descriptor.is_valid());
        assert!(descriptor.check_accessors().is_ok());
        assert_eq!(descriptor.table_name(), "TestTable");
        assert_eq!(descriptor.fields().len(), 7);
    }

    #[test]
    fn test_sample_descriptor_key() {
        let descriptor = sample_descriptor("TestTable").unwrap();

        let hash = descriptor.hash_key().unwrap();
        assert_eq!(hash.attribute_name, "Id");
        assert_eq!(hash.value_type, ValueType::Identifier);
        assert!(descriptor.range_key().is_none());
    }

    #[test]
    fn test_demo_entity() {
        let entity = SampleEntity::demo();

        assert_eq!(entity.title, "Sample Record 001");
        assert_eq!(entity.price.to_string(), "241.84");
        assert_eq!(entity.tags, vec!["Senectus", "Semper", "Inceptos"]);
        assert!(!entity.id.is_nil());
    }
}
