//! In-memory [`RecordStore`] for tests and local runs without a database.
//!
//! Mirrors the MySQL behavior the API depends on: ids auto-increment from 1
//! and are never reused, rows come back in insertion order with `id` first,
//! and every declared field is present (NULL when not supplied).

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use logbook_core::{CollectionSpec, Record};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::store::RecordStore;

#[derive(Debug, Default)]
struct MemoryTable {
    rows: BTreeMap<u64, Record>,
    last_id: u64,
}

/// Store holding every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, MemoryTable>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held for a table.
    pub async fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, |t| t.rows.len())
    }
}

/// Resolve an id the way MySQL compares a string with an integer key.
///
/// The leading numeric prefix is what counts, so `"1abc"` and `"1.0"` both
/// match row 1 while `"1.5"` and `"abc"` match nothing. Exponent forms such
/// as `"1e0"` are not recognized.
fn parse_id(id: &str) -> Option<u64> {
    let id = id.trim_start();
    let id = id.strip_prefix('+').unwrap_or(id);
    let digits = id.bytes().take_while(u8::is_ascii_digit).count();
    let (integer, rest) = id.split_at(digits);

    if let Some(fraction) = rest.strip_prefix('.')
        && fraction.bytes().take_while(u8::is_ascii_digit).any(|b| b != b'0')
    {
        return None;
    }

    integer.parse().ok()
}

fn build_row(spec: &CollectionSpec, id: u64, values: &[Value]) -> Record {
    let mut row = Record::with_capacity(spec.fields.len() + 1);
    row.insert("id".to_string(), Value::from(id));
    for (i, field) in spec.fields.iter().enumerate() {
        let value = values.get(i).cloned().unwrap_or(Value::Null);
        row.insert((*field).to_string(), value);
    }
    row
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, spec: &CollectionSpec) -> StoreResult<Vec<Record>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&spec.table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, spec: &CollectionSpec, id: &str) -> StoreResult<Option<Record>> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let tables = self.tables.read().await;
        Ok(tables
            .get(&spec.table)
            .and_then(|t| t.rows.get(&id))
            .cloned())
    }

    async fn insert(&self, spec: &CollectionSpec, values: &[Value]) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(spec.table.clone()).or_default();
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, build_row(spec, id, values));
        Ok(id)
    }

    async fn update(&self, spec: &CollectionSpec, id: &str, values: &[Value]) -> StoreResult<u64> {
        let Some(id) = parse_id(id) else {
            return Ok(0);
        };
        let mut tables = self.tables.write().await;
        match tables.get_mut(&spec.table).and_then(|t| t.rows.get_mut(&id)) {
            Some(row) => {
                *row = build_row(spec, id, values);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, spec: &CollectionSpec, id: &str) -> StoreResult<u64> {
        let Some(id) = parse_id(id) else {
            return Ok(0);
        };
        let mut tables = self.tables.write().await;
        let removed = tables
            .get_mut(&spec.table)
            .and_then(|t| t.rows.remove(&id));
        Ok(u64::from(removed.is_some()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
