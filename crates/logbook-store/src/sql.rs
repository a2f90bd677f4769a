//! SQL statement text for collection operations.
//!
//! Table and column names come from [`CollectionSpec`] and are backtick
//! quoted; every value, including the row id, is a `?` placeholder.

use logbook_core::CollectionSpec;

/// Quote a MySQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `SELECT * FROM <table>`
pub fn select_all(spec: &CollectionSpec) -> String {
    format!("SELECT * FROM {}", quote_identifier(&spec.table))
}

/// `SELECT * FROM <table> WHERE id = ?`
pub fn select_by_id(spec: &CollectionSpec) -> String {
    format!("SELECT * FROM {} WHERE id = ?", quote_identifier(&spec.table))
}

/// `INSERT INTO <table> (<fields>) VALUES (?, ...)`
pub fn insert(spec: &CollectionSpec) -> String {
    let columns: Vec<String> = spec.fields.iter().map(|f| quote_identifier(f)).collect();
    let placeholders = vec!["?"; spec.fields.len()];
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(&spec.table),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// `UPDATE <table> SET <field> = ?, ... WHERE id = ?`
pub fn update(spec: &CollectionSpec) -> String {
    let assignments: Vec<String> = spec
        .fields
        .iter()
        .map(|f| format!("{} = ?", quote_identifier(f)))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ?",
        quote_identifier(&spec.table),
        assignments.join(", ")
    )
}

/// `DELETE FROM <table> WHERE id = ?`
pub fn delete(spec: &CollectionSpec) -> String {
    format!("DELETE FROM {} WHERE id = ?", quote_identifier(&spec.table))
}
