//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB `AttributeValue` maps and
//! generic documents. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::{
    AttributeValue as DynamoValue, KeySchemaElement, KeyType, ScalarAttributeType,
    TableDescription as DynamoTable,
};
use dynamap_core::mapping::{AttributeValue, Document, KeySchema, MappingError, PrimaryKey};
use dynamap_core::storage::{RepositoryError, TableDescription};

pub type Item = HashMap<String, DynamoValue>;

// ============================================================================
// Attribute values
// ============================================================================

/// Convert a generic attribute to its DynamoDB form.
///
/// Fails for `Unsupported` placeholders: their content was never read, so
/// writing them back would lose data.
pub fn to_dynamo(name: &str, value: &AttributeValue) -> Result<DynamoValue, MappingError> {
    match value {
        AttributeValue::S(s) => Ok(DynamoValue::S(s.clone())),
        AttributeValue::N(n) => Ok(DynamoValue::N(n.clone())),
        AttributeValue::Bool(b) => Ok(DynamoValue::Bool(*b)),
        AttributeValue::L(items) => items
            .iter()
            .map(|item| to_dynamo(name, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynamoValue::L),
        AttributeValue::Null => Ok(DynamoValue::Null(true)),
        AttributeValue::Unsupported(kind) => Err(MappingError::UnsupportedAttribute {
            attribute: name.to_string(),
            kind: kind.to_string(),
        }),
    }
}

/// Convert a DynamoDB attribute to its generic form.
///
/// String sets are read as lists so tables written with `SS` tags still
/// load. Binary, number sets and maps become `Unsupported` placeholders,
/// which only fail if a mapped field reads them.
pub fn from_dynamo(value: &DynamoValue) -> AttributeValue {
    match value {
        DynamoValue::S(s) => AttributeValue::S(s.clone()),
        DynamoValue::N(n) => AttributeValue::N(n.clone()),
        DynamoValue::Bool(b) => AttributeValue::Bool(*b),
        DynamoValue::Null(_) => AttributeValue::Null,
        DynamoValue::L(items) => AttributeValue::L(items.iter().map(from_dynamo).collect()),
        DynamoValue::Ss(items) => {
            AttributeValue::L(items.iter().cloned().map(AttributeValue::S).collect())
        }
        other => AttributeValue::Unsupported(kind_name(other)),
    }
}

fn kind_name(value: &DynamoValue) -> &'static str {
    match value {
        DynamoValue::B(_) => "B",
        DynamoValue::Bs(_) => "BS",
        DynamoValue::M(_) => "M",
        DynamoValue::Ns(_) => "NS",
        _ => "unknown",
    }
}

// ============================================================================
// Items
// ============================================================================

/// Convert a document to a DynamoDB item.
pub fn document_to_item(document: &Document) -> Result<Item, MappingError> {
    document
        .iter()
        .map(|(name, value)| Ok((name.to_string(), to_dynamo(name, value)?)))
        .collect()
}

/// Convert a DynamoDB item to a document.
///
/// DynamoDB does not preserve attribute order, so attributes are sorted by
/// name.
pub fn item_to_document(item: &Item) -> Document {
    let mut attributes: Vec<(&String, &DynamoValue)> = item.iter().collect();
    attributes.sort_by(|a, b| a.0.cmp(b.0));

    attributes
        .into_iter()
        .map(|(name, value)| (name.clone(), from_dynamo(value)))
        .collect()
}

/// Convert a primary key to the `Key` map of a GetItem/DeleteItem request.
pub fn key_to_item(key: &PrimaryKey) -> Result<Item, MappingError> {
    key.attributes()
        .map(|attribute| {
            let value = to_dynamo(&attribute.name, &attribute.value)?;
            Ok((attribute.name.clone(), value))
        })
        .collect()
}

// ============================================================================
// Tables
// ============================================================================

/// Extract the key schema from DynamoDB's key elements.
pub fn key_schema_from_elements(elements: &[KeySchemaElement]) -> Option<KeySchema> {
    let name_of = |key_type: KeyType| {
        elements
            .iter()
            .find(|element| *element.key_type() == key_type)
            .map(|element| element.attribute_name().to_string())
    };

    let hash = name_of(KeyType::Hash)?;
    Some(KeySchema::new(hash, name_of(KeyType::Range)))
}

fn scalar_kind(scalar: &ScalarAttributeType) -> Option<&'static str> {
    match scalar {
        ScalarAttributeType::S => Some("S"),
        ScalarAttributeType::N => Some("N"),
        ScalarAttributeType::B => Some("B"),
        _ => None,
    }
}

/// Convert a DescribeTable response to a table description.
///
/// Key attribute kinds come from the table's attribute definitions.
pub fn table_description(
    table: &str,
    described: Option<&DynamoTable>,
) -> Result<TableDescription, RepositoryError> {
    let described =
        described.ok_or_else(|| RepositoryError::TableNotFound(table.to_string()))?;
    let key_schema = key_schema_from_elements(described.key_schema()).ok_or_else(|| {
        RepositoryError::QueryFailed(format!("Table {} reports no hash key", table))
    })?;

    let key_names: Vec<&str> = std::iter::once(key_schema.hash_key.as_str())
        .chain(key_schema.range_key.as_deref())
        .collect();
    let mut description = TableDescription::new(
        described.table_name().unwrap_or(table),
        key_schema.clone(),
    );

    for definition in described.attribute_definitions() {
        let name = definition.attribute_name();
        if !key_names.contains(&name) {
            continue;
        }
        if let Some(kind) = scalar_kind(definition.attribute_type()) {
            description = description.with_key_kind(name, kind);
        }
    }

    Ok(description)
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::primitives::Blob;
    use aws_sdk_dynamodb::types::AttributeDefinition;

    use super::*;

    fn element(name: &str, key_type: KeyType) -> KeySchemaElement {
        KeySchemaElement::builder()
            .attribute_name(name)
            .key_type(key_type)
            .build()
            .unwrap()
    }

    #[test]
    fn test_to_dynamo_maps_every_kind() {
        let convert = |value: AttributeValue| to_dynamo("Attr", &value).unwrap();

        assert_eq!(
            convert(AttributeValue::S("x".to_string())),
            DynamoValue::S("x".to_string())
        );
        assert_eq!(
            convert(AttributeValue::N("241.84".to_string())),
            DynamoValue::N("241.84".to_string())
        );
        assert_eq!(convert(AttributeValue::Bool(true)), DynamoValue::Bool(true));
        assert_eq!(convert(AttributeValue::Null), DynamoValue::Null(true));
        assert_eq!(
            convert(AttributeValue::L(vec![AttributeValue::S("a".to_string())])),
            DynamoValue::L(vec![DynamoValue::S("a".to_string())])
        );
    }

    #[test]
    fn test_to_dynamo_refuses_unsupported_placeholder() {
        let mut document = Document::new();
        document.insert("Id", AttributeValue::S("abc".to_string()));
        document.insert("Audit", AttributeValue::Unsupported("M"));

        let result = document_to_item(&document);

        assert_eq!(
            result,
            Err(MappingError::UnsupportedAttribute {
                attribute: "Audit".to_string(),
                kind: "M".to_string(),
            })
        );
    }

    #[test]
    fn test_document_item_round_trip() {
        let mut document = Document::new();
        document.insert("Id", AttributeValue::S("abc".to_string()));
        document.insert("Price", AttributeValue::N("241.84".to_string()));
        document.insert(
            "Tags",
            AttributeValue::L(vec![
                AttributeValue::S("Senectus".to_string()),
                AttributeValue::S("Semper".to_string()),
            ]),
        );

        let restored = item_to_document(&document_to_item(&document).unwrap());

        assert_eq!(restored, document);
    }

    #[test]
    fn test_item_to_document_sorts_attributes() {
        let mut item = Item::new();
        item.insert("Title".to_string(), DynamoValue::S("t".to_string()));
        item.insert("Id".to_string(), DynamoValue::S("i".to_string()));
        item.insert("Price".to_string(), DynamoValue::N("1".to_string()));

        let document = item_to_document(&item);

        let names: Vec<&str> = document.names().collect();
        assert_eq!(names, vec!["Id", "Price", "Title"]);
    }

    #[test]
    fn test_item_with_unmapped_map_attribute_still_loads() {
        let mut item = Item::new();
        item.insert("Id".to_string(), DynamoValue::S("abc".to_string()));
        item.insert("Title".to_string(), DynamoValue::S("Sample".to_string()));
        item.insert("Audit".to_string(), DynamoValue::M(HashMap::new()));

        let document = item_to_document(&item);

        assert_eq!(document.len(), 3);
        assert_eq!(document.get("Audit"), Some(&AttributeValue::Unsupported("M")));
        assert_eq!(
            document.get("Title"),
            Some(&AttributeValue::S("Sample".to_string()))
        );
    }

    #[test]
    fn test_string_set_reads_as_list() {
        let value = DynamoValue::Ss(vec!["a".to_string(), "b".to_string()]);

        let converted = from_dynamo(&value);

        assert_eq!(
            converted,
            AttributeValue::L(vec![
                AttributeValue::S("a".to_string()),
                AttributeValue::S("b".to_string()),
            ])
        );
    }

    #[test]
    fn test_unsupported_kinds_become_placeholders() {
        let binary = DynamoValue::B(Blob::new(vec![1, 2, 3]));
        let numbers = DynamoValue::Ns(vec!["1".to_string()]);
        let nested = DynamoValue::L(vec![DynamoValue::Bs(Vec::new())]);

        assert_eq!(from_dynamo(&binary), AttributeValue::Unsupported("B"));
        assert_eq!(from_dynamo(&numbers), AttributeValue::Unsupported("NS"));
        assert_eq!(
            from_dynamo(&nested),
            AttributeValue::L(vec![AttributeValue::Unsupported("BS")])
        );
    }

    #[test]
    fn test_key_to_item() {
        let key = PrimaryKey::new("Id", AttributeValue::S("abc".to_string()))
            .with_range("Version", AttributeValue::N("2".to_string()));

        let item = key_to_item(&key).unwrap();

        assert_eq!(item.len(), 2);
        assert_eq!(item.get("Id"), Some(&DynamoValue::S("abc".to_string())));
        assert_eq!(item.get("Version"), Some(&DynamoValue::N("2".to_string())));
    }

    #[test]
    fn test_key_schema_from_elements() {
        let elements = vec![
            element("Version", KeyType::Range),
            element("Id", KeyType::Hash),
        ];

        let schema = key_schema_from_elements(&elements).unwrap();

        assert_eq!(schema, KeySchema::new("Id", Some("Version".to_string())));
    }

    #[test]
    fn test_key_schema_requires_hash() {
        let elements = vec![element("Version", KeyType::Range)];
        assert!(key_schema_from_elements(&elements).is_none());
    }

    #[test]
    fn test_table_description_missing_table() {
        let result = table_description("TestTable", None);
        assert_eq!(
            result,
            Err(RepositoryError::TableNotFound("TestTable".to_string()))
        );
    }

    #[test]
    fn test_table_description() {
        let described = DynamoTable::builder()
            .table_name("TestTable")
            .key_schema(element("Id", KeyType::Hash))
            .build();

        let description = table_description("TestTable", Some(&described)).unwrap();

        assert_eq!(description.table_name, "TestTable");
        assert_eq!(description.key_schema, KeySchema::new("Id", None));
        assert!(description.key_kinds.is_empty());
    }

    #[test]
    fn test_table_description_reads_key_kinds() {
        let definition = |name: &str, kind: ScalarAttributeType| {
            AttributeDefinition::builder()
                .attribute_name(name)
                .attribute_type(kind)
                .build()
                .unwrap()
        };
        let described = DynamoTable::builder()
            .table_name("TestTable")
            .key_schema(element("Id", KeyType::Hash))
            .key_schema(element("Version", KeyType::Range))
            .attribute_definitions(definition("Id", ScalarAttributeType::S))
            .attribute_definitions(definition("Version", ScalarAttributeType::N))
            .attribute_definitions(definition("Owner", ScalarAttributeType::S))
            .build();

        let description = table_description("TestTable", Some(&described)).unwrap();

        assert_eq!(description.key_kind("Id"), Some("S"));
        assert_eq!(description.key_kind("Version"), Some("N"));
        // Index-only attributes are not part of the key
        assert_eq!(description.key_kind("Owner"), None);
    }
}
