//! Collection definitions.
//!
//! A [`CollectionSpec`] describes one REST-addressable resource: the route
//! segment it is served under, the table backing it, its columns, and the
//! rules applied when rows are created. The API server instantiates its CRUD
//! handlers once per spec.

use crate::error::{CoreError, CoreResult};

/// Route segment for the notes collection.
pub const NOTES: &str = "notes";

/// Route segment for the system logs collection.
pub const SYSTEM_LOGS: &str = "system-logs";

const NOTE_FIELDS: &[&str] = &["title", "date", "note"];

const NOTE_REQUIRED: &[&str] = &["title", "date", "note"];

const SYSTEM_LOG_FIELDS: &[&str] = &[
    "sysNo", "date", "partNo", "worksNo", "salesNo", "os", "winKey", "SerialNo", "batchNo",
    "rasV", "carusV", "rxcomV", "pcFunc", "pcMode", "notes",
];

const SYSTEM_LOG_REQUIRED: &[&str] = &["sysNo", "date", "os", "SerialNo"];

/// Shape of the body returned by a successful create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateEcho {
    /// `{id, <field>...}` with each field taken from the request (absent -> null).
    Fields,
    /// `{id, ...body}`: the request body verbatim, unknown keys included.
    /// A body key named `id` replaces the assigned id.
    RequestBody,
}

/// Definition of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    /// Route segment (`/notes`, `/system-logs`).
    pub name: &'static str,
    /// Entity name used in response messages.
    pub entity: &'static str,
    /// Backing table.
    pub table: String,
    /// Non-id columns, in statement order.
    pub fields: &'static [&'static str],
    /// Fields that must be truthy on create.
    pub required: &'static [&'static str],
    /// Message returned when a required field is missing.
    pub required_message: &'static str,
    /// Create response shape.
    pub echo: CreateEcho,
}

impl CollectionSpec {
    /// The notes collection, backed by `notes` unless renamed.
    pub fn notes() -> Self {
        Self {
            name: NOTES,
            entity: "Note",
            table: "notes".to_string(),
            fields: NOTE_FIELDS,
            required: NOTE_REQUIRED,
            required_message: "Title, date, and note are required",
            echo: CreateEcho::Fields,
        }
    }

    /// The system logs collection, backed by `system_logs` unless renamed.
    pub fn system_logs() -> Self {
        Self {
            name: SYSTEM_LOGS,
            entity: "System log",
            table: "system_logs".to_string(),
            fields: SYSTEM_LOG_FIELDS,
            required: SYSTEM_LOG_REQUIRED,
            required_message: "sysNo, date, os, and SerialNo are required",
            echo: CreateEcho::RequestBody,
        }
    }

    /// Point the collection at a different table.
    ///
    /// The name is spliced into SQL text, so it must be a plain identifier.
    pub fn with_table(mut self, table: impl Into<String>) -> CoreResult<Self> {
        let table = table.into();
        if !is_valid_identifier(&table) {
            return Err(CoreError::InvalidTableName(table));
        }
        self.table = table;
        Ok(self)
    }

    /// `"<Entity> not found"`
    pub fn not_found_message(&self) -> String {
        format!("{} not found", self.entity)
    }

    /// `"<Entity> updated successfully"`
    pub fn updated_message(&self) -> String {
        format!("{} updated successfully", self.entity)
    }

    /// `"<Entity> deleted successfully"`
    pub fn deleted_message(&self) -> String {
        format!("{} deleted successfully", self.entity)
    }
}

/// Whether `name` is usable as an unquoted SQL identifier.
///
/// Accepts ASCII letters, digits and underscores, not starting with a digit.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= 64 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
