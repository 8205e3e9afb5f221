use std::collections::HashMap;
use std::fmt;

use super::{Value, ValueError};

/// Reads a property off an entity.
pub type Getter<E> = fn(&E) -> Value;

/// Writes a property on an entity.
pub type Setter<E> = fn(&mut E, Value) -> Result<(), ValueError>;

/// Getter/setter pair for one named property.
pub struct PropertyAccessor<E> {
    pub get: Getter<E>,
    pub set: Setter<E>,
}

impl<E> Clone for PropertyAccessor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for PropertyAccessor<E> {}

/// Name-addressable property access for one entity type.
///
/// The mapper never inspects an entity's shape directly; it resolves every
/// configured property through this table once, when it is constructed.
///
/// ```
/// use dynamap_core::mapping::{AccessorTable, Value};
///
/// #[derive(Default)]
/// struct Note {
///     title: String,
/// }
///
/// let accessors = AccessorTable::<Note>::new().property(
///     "Title",
///     |note| Value::from(note.title.clone()),
///     |note, value| {
///         note.title = value.try_into()?;
///         Ok(())
///     },
/// );
/// assert!(accessors.contains("Title"));
/// ```
pub struct AccessorTable<E> {
    properties: HashMap<String, PropertyAccessor<E>>,
}

impl<E> Default for AccessorTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> AccessorTable<E> {
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
        }
    }

    /// Registers a property, replacing any previous accessor under that name.
    pub fn property(mut self, name: impl Into<String>, get: Getter<E>, set: Setter<E>) -> Self {
        self.properties
            .insert(name.into(), PropertyAccessor { get, set });
        self
    }

    pub fn get(&self, name: &str) -> Option<PropertyAccessor<E>> {
        self.properties.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<E> fmt::Debug for AccessorTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("AccessorTable")
            .field("properties", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::ValueType;

    #[derive(Debug, Default, PartialEq)]
    struct Flag {
        enabled: bool,
    }

    fn flag_accessors() -> AccessorTable<Flag> {
        AccessorTable::<Flag>::new().property(
            "Enabled",
            |flag| Value::Boolean(flag.enabled),
            |flag, value| {
                flag.enabled = value.try_into()?;
                Ok(())
            },
        )
    }

    #[test]
    fn test_get_and_set_by_name() {
        let accessors = flag_accessors();
        let accessor = accessors.get("Enabled").unwrap();

        let mut flag = Flag::default();
        (accessor.set)(&mut flag, Value::Boolean(true)).unwrap();

        assert!(flag.enabled);
        assert_eq!((accessor.get)(&flag), Value::Boolean(true));
    }

    #[test]
    fn test_setter_rejects_wrong_variant() {
        let accessor = flag_accessors().get("Enabled").unwrap();
        let mut flag = Flag::default();

        let result = (accessor.set)(&mut flag, Value::from("yes"));

        assert_eq!(
            result,
            Err(ValueError {
                expected: ValueType::Boolean,
                found: ValueType::Text,
            })
        );
        assert_eq!(flag, Flag::default());
    }

    #[test]
    fn test_unknown_property_is_absent() {
        let accessors = flag_accessors();
        assert!(accessors.get("Missing").is_none());
        assert_eq!(accessors.len(), 1);
    }
}
