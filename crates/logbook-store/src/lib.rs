//! logbook-store: storage layer for the logbook API
//!
//! This crate provides:
//! - The [`RecordStore`] trait the API server is written against
//! - [`MySqlStore`], a MySQL backend on a sqlx connection pool
//! - [`MemoryStore`], an in-process backend used as a test double
//! - SQL statement builders and the [`StoreError`] wire payload
//!
//! # Usage
//!
//! ```rust,ignore
//! use logbook_core::CollectionSpec;
//! use logbook_store::{MySqlStore, RecordStore, StoreConfig};
//!
//! let store = MySqlStore::connect_lazy(&StoreConfig::default());
//! store.ping().await?;
//!
//! let notes = CollectionSpec::notes();
//! let rows = store.list(&notes).await?;
//! ```

pub mod error;
pub mod memory;
pub mod mysql;
pub mod sql;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mysql::{MySqlStore, StoreConfig};
pub use store::RecordStore;

// Re-export logbook-core for downstream crates
pub use logbook_core;
