//! Core types for dynamap.
//!
//! This crate is the functional core: entity/field descriptors, the typed
//! value carrier, the conversion registry and the entity mapper, together
//! with the storage contracts implemented by the `dynamap` crate. Nothing in
//! here performs I/O.

pub mod mapping;
pub mod storage;
