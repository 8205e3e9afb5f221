//! Map typed entities to DynamoDB items.
//!
//! The mapping model lives in `dynamap_core`; this crate binds it to concrete
//! stores through [`repository::GenericRepository`] and the backends in
//! [`storage`].

pub mod config;
pub mod models;
pub mod output;
pub mod repository;
pub mod storage;
