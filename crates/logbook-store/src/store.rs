//! The store seam used by the API server.
//!
//! Handlers hold an `Arc<dyn RecordStore>` so the MySQL backend can be
//! swapped for [`MemoryStore`](crate::memory::MemoryStore) or any other double.

use async_trait::async_trait;
use logbook_core::{CollectionSpec, Record};
use serde_json::Value;

use crate::error::StoreResult;

/// Row-level operations over one collection's table.
///
/// Every method issues a single statement. `id` is passed through as an
/// opaque string; coercion, if any, is the backend's business. `values`
/// are in `spec.fields` order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All rows in storage order.
    async fn list(&self, spec: &CollectionSpec) -> StoreResult<Vec<Record>>;

    /// The row whose id matches, if any.
    async fn get(&self, spec: &CollectionSpec, id: &str) -> StoreResult<Option<Record>>;

    /// Insert a row and return the id assigned to it.
    async fn insert(&self, spec: &CollectionSpec, values: &[Value]) -> StoreResult<u64>;

    /// Overwrite every non-id column; returns the number of rows matched.
    async fn update(&self, spec: &CollectionSpec, id: &str, values: &[Value]) -> StoreResult<u64>;

    /// Remove the row; returns the number of rows removed.
    async fn delete(&self, spec: &CollectionSpec, id: &str) -> StoreResult<u64>;

    /// Connectivity check run at startup.
    async fn ping(&self) -> StoreResult<()>;

    /// Release connections on shutdown.
    async fn close(&self) {}
}
