use std::fmt;

use chrono::SecondsFormat;
use indexmap::IndexMap;
use serde::Serialize;

use super::Value;

/// A store-native attribute value.
///
/// This is the dynamically-typed representation exchanged with the store.
/// Numbers are kept as text so arbitrary precision survives the trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeValue {
    S(String),
    N(String),
    Bool(bool),
    L(Vec<AttributeValue>),
    Null,
    /// A stored kind with no mapping (binary, maps, number sets), named by
    /// its kind. Read-only: converters reject it.
    Unsupported(&'static str),
}

impl AttributeValue {
    /// Short kind name, matching DynamoDB's type descriptors.
    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::L(_) => "L",
            AttributeValue::Null => "NULL",
            AttributeValue::Unsupported(kind) => kind,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::S(s) | AttributeValue::N(s) => f.write_str(s),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::L(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            AttributeValue::Null => f.write_str("NULL"),
            AttributeValue::Unsupported(kind) => write!(f, "<{kind}>"),
        }
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Text(s) => AttributeValue::S(s),
            Value::Identifier(id) => AttributeValue::S(id.hyphenated().to_string()),
            // Equal numbers must encode to equal keys, whatever their scale
            Value::Decimal(d) => AttributeValue::N(d.normalize().to_string()),
            Value::Boolean(b) => AttributeValue::Bool(b),
            Value::Timestamp(ts) => {
                AttributeValue::S(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::TextList(items) => {
                AttributeValue::L(items.into_iter().map(AttributeValue::S).collect())
            }
        }
    }
}

/// An ordered attribute-name to value map.
///
/// Insertion order is preserved so serialization output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Document {
    attributes: IndexMap<String, AttributeValue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an attribute, returning the value it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: AttributeValue,
    ) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attribute names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, AttributeValue)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, AttributeValue)>>(iter: T) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, AttributeValue);
    type IntoIter = indexmap::map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_identifier_encodes_as_hyphenated_string() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
        assert_eq!(
            AttributeValue::from(Value::Identifier(id)),
            AttributeValue::S("550e8400-e29b-41d4-a716-446655440001".to_string())
        );
    }

    #[test]
    fn test_decimal_encodes_as_number() {
        let price = Decimal::new(24184, 2);
        assert_eq!(
            AttributeValue::from(Value::Decimal(price)),
            AttributeValue::N("241.84".to_string())
        );
    }

    #[test]
    fn test_equal_decimals_encode_identically() {
        let scaled = AttributeValue::from(Value::Decimal(Decimal::new(150, 2)));
        let plain = AttributeValue::from(Value::Decimal(Decimal::new(15, 1)));

        assert_eq!(scaled, AttributeValue::N("1.5".to_string()));
        assert_eq!(scaled, plain);
        assert_eq!(
            AttributeValue::from(Value::Decimal(Decimal::new(1000, 1))),
            AttributeValue::N("100".to_string())
        );
    }

    #[test]
    fn test_timestamp_encodes_as_utc_rfc3339() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(
            AttributeValue::from(Value::Timestamp(ts)),
            AttributeValue::S("2024-01-15T10:30:00Z".to_string())
        );
    }

    #[test]
    fn test_text_list_encodes_as_ordered_list() {
        let tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(
            AttributeValue::from(Value::TextList(tags)),
            AttributeValue::L(vec![
                AttributeValue::S("b".to_string()),
                AttributeValue::S("a".to_string()),
                AttributeValue::S("b".to_string()),
            ])
        );
    }

    #[test]
    fn test_document_preserves_insertion_order() {
        let mut document = Document::new();
        document.insert("Title", AttributeValue::S("x".to_string()));
        document.insert("Id", AttributeValue::S("y".to_string()));
        document.insert("Price", AttributeValue::N("1".to_string()));

        let names: Vec<&str> = document.names().collect();
        assert_eq!(names, vec!["Title", "Id", "Price"]);
    }

    #[test]
    fn test_document_serializes_as_json_object() {
        let mut document = Document::new();
        document.insert("Title", AttributeValue::S("Sample".to_string()));
        document.insert("Active", AttributeValue::Bool(true));

        let json = serde_json::to_string(&document).unwrap();
        assert_eq!(json, r#"{"Title":{"S":"Sample"},"Active":{"Bool":true}}"#);
    }
}
