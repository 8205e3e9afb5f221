//! In-memory storage backend.
//!
//! Holds tables in process memory. Used by the test suite and as the default
//! backend of the `dynamap` binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use dynamap::storage::inmemory::InMemoryStore;
//! use dynamap_core::mapping::KeySchema;
//!
//! let store = InMemoryStore::with_tables([("TestTable".to_string(), KeySchema::new("Id", None))]);
//! ```

mod store;

pub use store::InMemoryStore;
