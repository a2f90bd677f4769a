//! logbook-server: HTTP API server for notes and system logs
//!
//! This crate provides:
//! - REST endpoints (list, get, create, update, delete) per collection
//! - One generic handler set instantiated for `notes` and `system-logs`
//! - JSON error responses with the store's error payload on failures
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - Trailing slash trimming (`/notes/` is served as `/notes`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use logbook_server::{AppState, Collection, ServerConfig, build_app};
//! use logbook_store::MemoryStore;
//!
//! let config = ServerConfig::from_env()?;
//! let store = Arc::new(MemoryStore::new());
//! let state = AppState::new(config.clone(), vec![
//!     Collection::new(config.notes_spec()?, store.clone()),
//!     Collection::new(config.system_logs_spec()?, store),
//! ]);
//! let app = build_app(&state)?;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult, MessageResponse};
pub use state::{AppState, Collection};

// Re-export dependent crates
pub use logbook_core;
pub use logbook_store;

/// The complete application service.
pub type App = NormalizePath<Router>;

/// Build the router with the full middleware stack.
///
/// Layers, outermost first: trailing slash trimming, request id assignment,
/// tracing, request id propagation to the response, CORS.
///
/// Path normalization has to run before routing, so it wraps the router
/// instead of being added with [`Router::layer`].
pub fn build_app(state: &AppState) -> Result<App, ConfigError> {
    let cors = middleware::build_cors_layer(&state.config().cors_allowed_origins)?;

    let router = routes::build_router(state)
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::propagate_request_id))
        .layer(middleware::trace_layer())
        .layer(middleware::request_id_layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
