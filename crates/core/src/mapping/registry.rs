use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::{AttributeValue, MappingError, Value, ValueType};

/// Decodes a store attribute into a typed value. The first argument is the
/// attribute name, used for error reporting.
pub type Converter = fn(&str, &AttributeValue) -> Result<Value, MappingError>;

/// How the mapper treats attributes that are absent or `NULL` in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingAttributePolicy {
    /// Fail with [`MappingError::MissingAttribute`].
    #[default]
    Reject,
    /// Substitute [`ValueType::zero_value`].
    ZeroValue,
}

impl FromStr for MissingAttributePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(MissingAttributePolicy::Reject),
            "zero" | "zero-value" => Ok(MissingAttributePolicy::ZeroValue),
            other => Err(format!("Unknown missing attribute policy: {}", other)),
        }
    }
}

/// Declared type to converter table.
///
/// Lookup is an exhaustive match, so every [`ValueType`] always has a
/// converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionRegistry {
    missing: MissingAttributePolicy,
}

impl ConversionRegistry {
    pub fn new(missing: MissingAttributePolicy) -> Self {
        Self { missing }
    }

    pub fn missing_attribute_policy(&self) -> MissingAttributePolicy {
        self.missing
    }

    pub fn converter(&self, value_type: ValueType) -> Converter {
        match value_type {
            ValueType::Text => to_text,
            ValueType::Identifier => to_identifier,
            ValueType::Decimal => to_decimal,
            ValueType::Boolean => to_boolean,
            ValueType::Timestamp => to_timestamp,
            ValueType::TextList => to_text_list,
        }
    }

    /// Decodes the attribute `name` of `value_type`, applying the missing
    /// attribute policy when `attribute` is absent or `NULL`.
    pub fn convert(
        &self,
        name: &str,
        value_type: ValueType,
        attribute: Option<&AttributeValue>,
    ) -> Result<Value, MappingError> {
        match attribute.filter(|attribute| !attribute.is_null()) {
            Some(attribute) => self.converter(value_type)(name, attribute),
            None => match self.missing {
                MissingAttributePolicy::Reject => Err(MappingError::MissingAttribute {
                    attribute: name.to_string(),
                }),
                MissingAttributePolicy::ZeroValue => Ok(value_type.zero_value()),
            },
        }
    }
}

// ============================================================================
// Converters
// ============================================================================

fn to_text(name: &str, attribute: &AttributeValue) -> Result<Value, MappingError> {
    match attribute {
        AttributeValue::S(s) | AttributeValue::N(s) => Ok(Value::Text(s.clone())),
        other => Err(mismatch(name, ValueType::Text, other)),
    }
}

fn to_identifier(name: &str, attribute: &AttributeValue) -> Result<Value, MappingError> {
    match attribute {
        AttributeValue::S(s) => Uuid::parse_str(s)
            .map(Value::Identifier)
            .map_err(|e| invalid(name, ValueType::Identifier, e)),
        other => Err(mismatch(name, ValueType::Identifier, other)),
    }
}

fn to_decimal(name: &str, attribute: &AttributeValue) -> Result<Value, MappingError> {
    match attribute {
        AttributeValue::N(s) | AttributeValue::S(s) => Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map(Value::Decimal)
            .map_err(|e| invalid(name, ValueType::Decimal, e)),
        other => Err(mismatch(name, ValueType::Decimal, other)),
    }
}

fn to_boolean(name: &str, attribute: &AttributeValue) -> Result<Value, MappingError> {
    match attribute {
        AttributeValue::Bool(b) => Ok(Value::Boolean(*b)),
        // Older SDKs persisted booleans as 0/1 numbers.
        AttributeValue::N(n) => match n.as_str() {
            "0" => Ok(Value::Boolean(false)),
            "1" => Ok(Value::Boolean(true)),
            _ => Err(invalid(name, ValueType::Boolean, format!("{} is not 0 or 1", n))),
        },
        other => Err(mismatch(name, ValueType::Boolean, other)),
    }
}

fn to_timestamp(name: &str, attribute: &AttributeValue) -> Result<Value, MappingError> {
    match attribute {
        AttributeValue::S(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Value::Timestamp(dt.with_timezone(&Utc)))
            .map_err(|e| invalid(name, ValueType::Timestamp, e)),
        other => Err(mismatch(name, ValueType::Timestamp, other)),
    }
}

fn to_text_list(name: &str, attribute: &AttributeValue) -> Result<Value, MappingError> {
    match attribute {
        AttributeValue::L(items) => items
            .iter()
            .map(|item| match item {
                AttributeValue::S(s) => Ok(s.clone()),
                other => Err(mismatch(name, ValueType::TextList, other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::TextList),
        other => Err(mismatch(name, ValueType::TextList, other)),
    }
}

fn mismatch(name: &str, expected: ValueType, found: &AttributeValue) -> MappingError {
    match found {
        AttributeValue::Unsupported(kind) => MappingError::UnsupportedAttribute {
            attribute: name.to_string(),
            kind: kind.to_string(),
        },
        other => MappingError::TypeMismatch {
            attribute: name.to_string(),
            expected,
            found: other.kind(),
        },
    }
}

fn invalid(name: &str, expected: ValueType, reason: impl ToString) -> MappingError {
    MappingError::InvalidValue {
        attribute: name.to_string(),
        expected,
        reason: reason.to_string(),
    }
}
