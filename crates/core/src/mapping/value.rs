use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Declared type of a mapped field.
///
/// The set is closed: every variant has exactly one converter in the
/// [`ConversionRegistry`](super::ConversionRegistry).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ValueType {
    #[default]
    Text,
    Identifier,
    Decimal,
    Boolean,
    Timestamp,
    TextList,
}

impl ValueType {
    /// Every supported type, in declaration order.
    pub const ALL: [ValueType; 6] = [
        ValueType::Text,
        ValueType::Identifier,
        ValueType::Decimal,
        ValueType::Boolean,
        ValueType::Timestamp,
        ValueType::TextList,
    ];

    /// The natural "empty" value for this type.
    ///
    /// Used when a document lacks an attribute and the mapper runs with
    /// [`MissingAttributePolicy::ZeroValue`](super::MissingAttributePolicy).
    pub fn zero_value(self) -> Value {
        match self {
            ValueType::Text => Value::Text(String::new()),
            ValueType::Identifier => Value::Identifier(Uuid::nil()),
            ValueType::Decimal => Value::Decimal(Decimal::ZERO),
            ValueType::Boolean => Value::Boolean(false),
            ValueType::Timestamp => Value::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
            ValueType::TextList => Value::TextList(Vec::new()),
        }
    }
}

impl ValueType {
    /// Kind of the store attribute this type is written as, in the same
    /// notation as [`AttributeValue::kind`](super::AttributeValue::kind).
    pub fn stored_kind(self) -> &'static str {
        match self {
            ValueType::Text | ValueType::Identifier | ValueType::Timestamp => "S",
            ValueType::Decimal => "N",
            ValueType::Boolean => "BOOL",
            ValueType::TextList => "L",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Text => "text",
            ValueType::Identifier => "identifier",
            ValueType::Decimal => "decimal",
            ValueType::Boolean => "boolean",
            ValueType::Timestamp => "timestamp",
            ValueType::TextList => "text list",
        };
        f.write_str(name)
    }
}

/// A typed field value moving between an entity and a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Identifier(Uuid),
    Decimal(Decimal),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    TextList(Vec<String>),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Text(_) => ValueType::Text,
            Value::Identifier(_) => ValueType::Identifier,
            Value::Decimal(_) => ValueType::Decimal,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Timestamp(_) => ValueType::Timestamp,
            Value::TextList(_) => ValueType::TextList,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Identifier(id) => write!(f, "{id}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Value::TextList(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// A setter received a value of a different type than it stores.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("expected {expected}, got {found}")]
pub struct ValueError {
    pub expected: ValueType,
    pub found: ValueType,
}

macro_rules! value_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = ValueError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(ValueError {
                            expected: ValueType::$variant,
                            found: other.value_type(),
                        }),
                    }
                }
            }
        )*
    };
}

value_conversions! {
    String => Text,
    Uuid => Identifier,
    Decimal => Decimal,
    bool => Boolean,
    DateTime<Utc> => Timestamp,
    Vec<String> => TextList,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::AttributeValue;

    #[test]
    fn test_default_value_type_is_text() {
        assert_eq!(ValueType::default(), ValueType::Text);
    }

    #[test]
    fn test_stored_kind_matches_encoding() {
        for ty in ValueType::ALL {
            let encoded = AttributeValue::from(ty.zero_value());
            assert_eq!(ty.stored_kind(), encoded.kind(), "{ty}");
        }
    }

    #[test]
    fn test_zero_values_match_their_type() {
        for ty in ValueType::ALL {
            assert_eq!(ty.zero_value().value_type(), ty);
        }
    }

    #[test]
    fn test_try_from_matching_variant() {
        let id = Uuid::new_v4();
        let extracted: Uuid = Value::Identifier(id).try_into().unwrap();
        assert_eq!(extracted, id);
    }

    #[test]
    fn test_try_from_mismatched_variant() {
        let result: Result<bool, _> = Value::from("true").try_into();
        assert_eq!(
            result,
            Err(ValueError {
                expected: ValueType::Boolean,
                found: ValueType::Text,
            })
        );
    }

    #[test]
    fn test_text_list_display() {
        let value = Value::from(vec!["Senectus".to_string(), "Semper".to_string()]);
        assert_eq!(value.to_string(), "[Senectus, Semper]");
    }
}
