//! Entity-to-document mapping.
//!
//! Descriptors say which entity properties map to which store attributes and
//! with what type; the [`GenericEntityMapper`] uses them, together with each
//! entity's [`AccessorTable`], to convert entities to [`Document`]s and back.

mod accessors;
mod document;
mod entity;
mod error;
mod field;
mod key;
mod mapper;
mod registry;
mod value;

pub use accessors::{AccessorTable, Getter, PropertyAccessor, Setter};
pub use document::{AttributeValue, Document};
pub use entity::{Entity, EntityDescriptor, FieldRef};
pub use error::{ConfigurationError, MappingError};
pub use field::FieldDescriptor;
pub use key::{KeyAttribute, KeySchema, PrimaryKey};
pub use mapper::{EntityMapper, GenericEntityMapper};
pub use registry::{ConversionRegistry, Converter, MissingAttributePolicy};
pub use value::{Value, ValueError, ValueType};
