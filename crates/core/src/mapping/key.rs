use std::fmt;

use super::{AttributeValue, Document};

/// Attribute names forming a table's primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    pub hash_key: String,
    pub range_key: Option<String>,
}

impl KeySchema {
    pub fn new(hash_key: impl Into<String>, range_key: Option<String>) -> Self {
        Self {
            hash_key: hash_key.into(),
            range_key,
        }
    }
}

impl fmt::Display for KeySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range_key {
            Some(range) => write!(f, "HASH({}) RANGE({})", self.hash_key, range),
            None => write!(f, "HASH({})", self.hash_key),
        }
    }
}

/// One named key attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyAttribute {
    pub name: String,
    pub value: AttributeValue,
}

/// The primary key of a single item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimaryKey {
    pub hash: KeyAttribute,
    pub range: Option<KeyAttribute>,
}

impl PrimaryKey {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            hash: KeyAttribute {
                name: name.into(),
                value,
            },
            range: None,
        }
    }

    pub fn with_range(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.range = Some(KeyAttribute {
            name: name.into(),
            value,
        });
        self
    }

    /// Extracts the key described by `schema` from an item.
    ///
    /// Returns `None` when the item lacks one of the key attributes.
    pub fn from_document(schema: &KeySchema, document: &Document) -> Option<Self> {
        let hash = document.get(&schema.hash_key)?.clone();
        let key = Self::new(schema.hash_key.clone(), hash);
        match &schema.range_key {
            Some(range_name) => {
                let range = document.get(range_name)?.clone();
                Some(key.with_range(range_name.clone(), range))
            }
            None => Some(key),
        }
    }

    /// The schema this key is shaped after.
    pub fn schema(&self) -> KeySchema {
        KeySchema::new(
            self.hash.name.clone(),
            self.range.as_ref().map(|range| range.name.clone()),
        )
    }

    /// Whether `document` holds exactly this key's attributes and values.
    pub fn is_carried_by(&self, document: &Document) -> bool {
        Self::from_document(&self.schema(), document).as_ref() == Some(self)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &KeyAttribute> {
        std::iter::once(&self.hash).chain(self.range.as_ref())
    }

    pub fn to_document(&self) -> Document {
        self.attributes()
            .map(|attribute| (attribute.name.clone(), attribute.value.clone()))
            .collect()
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.hash.name, self.hash.value)?;
        if let Some(range) = &self.range {
            write!(f, ", {}={}", range.name, range.value)?;
        }
        Ok(())
    }
}
