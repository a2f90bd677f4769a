//! HTTP middleware.

pub mod cors;
pub mod request_id;

pub use cors::build_cors_layer;
pub use request_id::{propagate_request_id, request_id_layer, trace_layer};
