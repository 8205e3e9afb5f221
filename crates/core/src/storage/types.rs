use std::collections::HashMap;
use std::str::FromStr;

use crate::mapping::KeySchema;

/// Precondition attached to a put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteCondition {
    /// Unconditional put; replaces any existing item.
    Always,
    /// Only write if no item with the same key exists.
    KeyAbsent,
    /// Only write if an item with the same key exists.
    KeyPresent,
}

impl WriteCondition {
    /// Checks the condition against whether the key currently exists.
    pub fn holds(self, exists: bool) -> bool {
        match self {
            WriteCondition::Always => true,
            WriteCondition::KeyAbsent => !exists,
            WriteCondition::KeyPresent => exists,
        }
    }
}

/// Result of a conditional put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The condition did not hold and nothing was written.
    ConditionFailed,
}

/// What `create` does when an item with the same key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreatePolicy {
    /// Replace the stored item, like a plain put.
    #[default]
    Overwrite,
    /// Fail with `RepositoryError::AlreadyExists`.
    RejectExisting,
}

impl CreatePolicy {
    pub fn write_condition(self) -> WriteCondition {
        match self {
            CreatePolicy::Overwrite => WriteCondition::Always,
            CreatePolicy::RejectExisting => WriteCondition::KeyAbsent,
        }
    }
}

impl FromStr for CreatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(CreatePolicy::Overwrite),
            "reject-existing" | "reject" => Ok(CreatePolicy::RejectExisting),
            other => Err(format!("Unknown create policy: {}", other)),
        }
    }
}

/// What the store reports about a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescription {
    pub table_name: String,
    pub key_schema: KeySchema,
    /// Declared kind (`S`, `N`, `B`) of each key attribute. Stores that do
    /// not type their keys leave this empty.
    pub key_kinds: HashMap<String, &'static str>,
}

impl TableDescription {
    /// A description with untyped key attributes.
    pub fn new(table_name: impl Into<String>, key_schema: KeySchema) -> Self {
        Self {
            table_name: table_name.into(),
            key_schema,
            key_kinds: HashMap::new(),
        }
    }

    pub fn with_key_kind(mut self, attribute: impl Into<String>, kind: &'static str) -> Self {
        self.key_kinds.insert(attribute.into(), kind);
        self
    }

    /// Declared kind of a key attribute, if the store reported one.
    pub fn key_kind(&self, attribute: &str) -> Option<&'static str> {
        self.key_kinds.get(attribute).copied()
    }
}
