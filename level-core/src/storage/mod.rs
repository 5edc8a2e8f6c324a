//! Storage layer
//!
//! SQLite persistence for every Level entity. Row-level statements take a
//! borrowed `Connection` so callers can compose them inside one transaction.

mod error;
pub mod groups;
pub mod migrations;
pub mod spaces;
pub mod sql_store;

pub use error::StorageError;
pub use migrations::{migrate, CURRENT_SCHEMA_VERSION};
pub use sql_store::SqlStore;
