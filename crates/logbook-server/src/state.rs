//! Application state shared across handlers.

use std::sync::Arc;

use logbook_core::CollectionSpec;
use logbook_store::RecordStore;

use crate::config::ServerConfig;

/// One collection paired with the store that holds it.
///
/// This is the state of the per-collection CRUD routes and is extracted in
/// handlers as `State<Collection>`.
#[derive(Clone)]
pub struct Collection {
    spec: Arc<CollectionSpec>,
    store: Arc<dyn RecordStore>,
}

impl Collection {
    /// Pair a collection definition with its store.
    pub fn new(spec: CollectionSpec, store: Arc<dyn RecordStore>) -> Self {
        Self {
            spec: Arc::new(spec),
            store,
        }
    }

    /// Get the collection definition.
    pub fn spec(&self) -> &CollectionSpec {
        &self.spec
    }

    /// Get the backing store.
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.spec.name)
            .field("table", &self.spec.table)
            .finish_non_exhaustive()
    }
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Served collections.
    collections: Arc<[Collection]>,
    /// Server configuration.
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ServerConfig, collections: Vec<Collection>) -> Self {
        Self {
            collections: collections.into(),
            config: Arc::new(config),
        }
    }

    /// Get the served collections.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Release store connections.
    ///
    /// Collections that share a store close it more than once; closing a
    /// closed pool is a no-op.
    pub async fn close(&self) {
        for collection in self.collections.iter() {
            collection.store().close().await;
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("collections", &self.collections)
            .finish_non_exhaustive()
    }
}
