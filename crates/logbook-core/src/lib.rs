//! logbook-core: collection definitions and record rules
//!
//! This crate provides:
//! - [`CollectionSpec`] for the `notes` and `system-logs` collections
//! - The [`Record`] type shared by rows and request bodies
//! - Create validation with JavaScript truthiness
//! - Column value extraction and create-response shaping
//!
//! It performs no I/O; the store and server crates build on it.

pub mod collection;
pub mod error;
pub mod record;

pub use collection::{CollectionSpec, CreateEcho, NOTES, SYSTEM_LOGS, is_valid_identifier};
pub use error::{CoreError, CoreResult, ValidationError};
pub use record::{Record, column_values, created_response, is_truthy, validate_create};
