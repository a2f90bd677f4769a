//! MySQL implementation of [`RecordStore`].
//!
//! Rows are read with `SELECT *` and decoded column by column according to
//! the type the server reports, so tables may use whatever native column
//! types they like.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use logbook_core::{CollectionSpec, Record};
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error::{StoreError, StoreResult};
use crate::sql;
use crate::store::RecordStore;

/// Configuration for connecting to one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// User name.
    pub user: String,
    /// Password (may be empty).
    pub password: String,
    /// Database (schema) name.
    pub database: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "NotesApp".to_string(),
            max_connections: 10,
        }
    }
}

impl StoreConfig {
    /// Driver connection options for this configuration.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// Store backed by a MySQL connection pool.
#[derive(Debug, Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    database: String,
}

impl MySqlStore {
    /// Connect eagerly, failing if the server cannot be reached.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        tracing::info!(database = %config.database, "Connecting to database...");

        let pool = Self::pool_options(config)
            .connect_with(config.connect_options())
            .await?;

        Ok(Self {
            pool,
            database: config.database.clone(),
        })
    }

    /// Build the pool without opening a connection.
    ///
    /// Connections are established on first use, so an unreachable server
    /// surfaces as a per-request error rather than a startup failure.
    pub fn connect_lazy(config: &StoreConfig) -> Self {
        let pool = Self::pool_options(config).connect_lazy_with(config.connect_options());

        Self {
            pool,
            database: config.database.clone(),
        }
    }

    /// Create a store from an existing connection pool.
    pub fn from_pool(pool: MySqlPool, database: impl Into<String>) -> Self {
        Self {
            pool,
            database: database.into(),
        }
    }

    /// Name of the database this store talks to.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    fn pool_options(config: &StoreConfig) -> MySqlPoolOptions {
        MySqlPoolOptions::new().max_connections(config.max_connections)
    }
}

#[async_trait]
impl RecordStore for MySqlStore {
    async fn list(&self, spec: &CollectionSpec) -> StoreResult<Vec<Record>> {
        let sql = sql::select_all(spec);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, &sql))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn get(&self, spec: &CollectionSpec, id: &str) -> StoreResult<Option<Record>> {
        let sql = sql::select_by_id(spec);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, &sql))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn insert(&self, spec: &CollectionSpec, values: &[Value]) -> StoreResult<u64> {
        let sql = sql::insert(spec);
        let query = values.iter().fold(sqlx::query(&sql), bind_value);
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, &sql))?;

        tracing::debug!(table = %spec.table, id = result.last_insert_id(), "Inserted row");
        Ok(result.last_insert_id())
    }

    async fn update(&self, spec: &CollectionSpec, id: &str, values: &[Value]) -> StoreResult<u64> {
        let sql = sql::update(spec);
        let query = values.iter().fold(sqlx::query(&sql), bind_value).bind(id);
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, &sql))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, spec: &CollectionSpec, id: &str) -> StoreResult<u64> {
        let sql = sql::delete(spec);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, &sql))?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(e, "SELECT 1"))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!(database = %self.database, "Closed database pool");
    }
}

/// Bind one JSON value as a statement parameter.
fn bind_value<'q>(query: MySqlQuery<'q>, value: &'q Value) -> MySqlQuery<'q> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(u) = n.as_u64() {
                query.bind(u)
            } else {
                query.bind(n.as_f64())
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => query.bind(value.to_string()),
    }
}

fn row_to_record(row: &MySqlRow) -> StoreResult<Record> {
    let mut record = Record::with_capacity(row.columns().len());
    for column in row.columns() {
        let value = decode_column(row, column.ordinal())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn decode_column(row: &MySqlRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_string();

    let value = match type_name.as_str() {
        // TINYINT(1); clients see it as 0/1.
        "BOOLEAN" => Value::from(i64::from(row.try_get::<bool, _>(index)?)),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get::<i64, _>(index)?)
        }
        "YEAR" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        name if name.ends_with("UNSIGNED") => Value::from(row.try_get::<u64, _>(index)?),
        "FLOAT" => Value::from(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => Value::from(row.try_get::<f64, _>(index)?),
        "DATE" => Value::from(row.try_get::<NaiveDate, _>(index)?.format("%Y-%m-%d").to_string()),
        "DATETIME" => Value::from(
            row.try_get::<NaiveDateTime, _>(index)?
                .format("%Y-%m-%d %H:%M:%S%.f")
                .to_string(),
        ),
        "TIMESTAMP" => Value::from(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339()),
        "TIME" => Value::from(row.try_get::<NaiveTime, _>(index)?.format("%H:%M:%S%.f").to_string()),
        "JSON" => row.try_get::<sqlx::types::Json<Value>, _>(index)?.0,
        // Text, DECIMAL and anything else the server sends as a string.
        _ => match row.try_get_unchecked::<String, _>(index) {
            Ok(s) => Value::from(s),
            Err(_) => {
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
                Value::from(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };

    Ok(value)
}
