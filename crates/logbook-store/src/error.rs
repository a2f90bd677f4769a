//! Error types for the storage layer.
//!
//! Store failures are surfaced to API clients verbatim, so besides the
//! `Display` text each variant also renders a JSON payload via
//! [`StoreError::payload`] shaped like a MySQL client error.

use serde_json::{Value, json};
use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database rejected a statement.
    #[error("{code}: {message}")]
    Database {
        /// Symbolic error name (`ER_NO_SUCH_TABLE`, ...).
        code: String,
        /// Server error number.
        errno: u16,
        /// SQLSTATE, when the server sent one.
        sql_state: Option<String>,
        /// Server error message.
        message: String,
        /// Statement that failed.
        sql: Option<String>,
    },

    /// The database could not be reached (I/O, TLS, pool timeout or closed).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A row could not be converted to JSON.
    #[error("row decode failed: {0}")]
    Decode(String),

    /// Invalid store configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Convert a driver error, remembering the statement that raised it.
    pub fn from_sqlx(err: sqlx::Error, sql: &str) -> Self {
        match Self::from(err) {
            Self::Database {
                code,
                errno,
                sql_state,
                message,
                sql: None,
            } => Self::Database {
                code,
                errno,
                sql_state,
                message,
                sql: Some(sql.trim().to_string()),
            },
            other => other,
        }
    }

    /// JSON body returned to API clients for this error.
    pub fn payload(&self) -> Value {
        match self {
            Self::Database {
                code,
                errno,
                sql_state,
                message,
                sql,
            } => json!({
                "code": code,
                "errno": errno,
                "sqlMessage": message,
                "sqlState": sql_state,
                "sql": sql,
                "fatal": false,
            }),
            Self::Unavailable(message) => json!({
                "code": "STORE_UNAVAILABLE",
                "fatal": true,
                "message": message,
            }),
            Self::Decode(message) => json!({
                "code": "ROW_DECODE_FAILED",
                "fatal": false,
                "message": message,
            }),
            Self::Config(message) => json!({
                "code": "STORE_CONFIG",
                "fatal": true,
                "message": message,
            }),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => {
                let message = db.message().to_string();
                match db.try_downcast_ref::<MySqlDatabaseError>() {
                    Some(mysql) => Self::Database {
                        code: mysql_error_name(mysql.number()),
                        errno: mysql.number(),
                        sql_state: mysql.code().map(str::to_string),
                        message,
                        sql: None,
                    },
                    None => Self::Database {
                        code: "ER_UNKNOWN".to_string(),
                        errno: 0,
                        sql_state: db.code().map(|c| c.into_owned()),
                        message,
                        sql: None,
                    },
                }
            }
            sqlx::Error::Io(e) => Self::Unavailable(e.to_string()),
            sqlx::Error::Tls(e) => Self::Unavailable(e.to_string()),
            sqlx::Error::PoolTimedOut => Self::Unavailable("pool timed out".to_string()),
            sqlx::Error::PoolClosed => Self::Unavailable("pool closed".to_string()),
            sqlx::Error::Configuration(e) => Self::Config(e.to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::Decode(format!("column {index}: {source}"))
            }
            sqlx::Error::Decode(e) => Self::Decode(e.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Symbolic name for the MySQL errors this API is likely to hit.
fn mysql_error_name(errno: u16) -> String {
    let name = match errno {
        1045 => "ER_ACCESS_DENIED_ERROR",
        1048 => "ER_BAD_NULL_ERROR",
        1049 => "ER_BAD_DB_ERROR",
        1054 => "ER_BAD_FIELD_ERROR",
        1062 => "ER_DUP_ENTRY",
        1064 => "ER_PARSE_ERROR",
        1146 => "ER_NO_SUCH_TABLE",
        1264 => "ER_WARN_DATA_OUT_OF_RANGE",
        1292 => "ER_TRUNCATED_WRONG_VALUE",
        1364 => "ER_NO_DEFAULT_FOR_FIELD",
        1366 => "ER_TRUNCATED_WRONG_VALUE_FOR_FIELD",
        1406 => "ER_DATA_TOO_LONG",
        _ => return format!("ER_{errno}"),
    };
    name.to_string()
}
