//! Server configuration from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use logbook_core::{CollectionSpec, is_valid_identifier};
use logbook_store::StoreConfig;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
    /// Database host.
    pub db_host: String,
    /// Database port.
    pub db_port: u16,
    /// Database user.
    pub db_user: String,
    /// Database password.
    pub db_password: String,
    /// Database holding the notes table.
    pub notes_database: String,
    /// Database holding the system logs table.
    pub systems_database: String,
    /// Notes table name.
    pub notes_table: String,
    /// System logs table name.
    pub system_logs_table: String,
    /// Pool size per database.
    pub db_max_connections: u32,
    /// Refuse to start when the startup connectivity check fails.
    pub require_store_on_startup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3003,
            log_level: "info".to_string(),
            cors_allowed_origins: "*".to_string(),
            db_host: "localhost".to_string(),
            db_port: 3306,
            db_user: "root".to_string(),
            db_password: String::new(),
            notes_database: "NotesApp".to_string(),
            systems_database: "systems".to_string(),
            notes_table: "notes".to_string(),
            system_logs_table: "system_logs".to_string(),
            db_max_connections: 10,
            require_store_on_startup: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `PORT`: Server port (default: 3003)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    /// - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`: Database server
    ///   (default: localhost, 3306, root, empty)
    /// - `DB_NAME`: Single database for both collections
    /// - `NOTES_DB_NAME`, `SYSTEMS_DB_NAME`: Per-collection databases when
    ///   `DB_NAME` is unset (default: "NotesApp", "systems")
    /// - `NOTES_TABLE`, `SYSTEM_LOGS_TABLE`: Table names
    ///   (default: "notes", "system_logs")
    /// - `DB_MAX_CONNECTIONS`: Pool size per database (default: 10)
    /// - `DB_REQUIRE_ON_STARTUP`: Exit if the database is unreachable at
    ///   startup (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let (notes_database, systems_database) = match lookup("DB_NAME") {
            Some(name) => (name.clone(), name),
            None => (
                lookup("NOTES_DB_NAME").unwrap_or(defaults.notes_database),
                lookup("SYSTEMS_DB_NAME").unwrap_or(defaults.systems_database),
            ),
        };

        let notes_table = table_var(&lookup, "NOTES_TABLE", defaults.notes_table)?;
        let system_logs_table = table_var(&lookup, "SYSTEM_LOGS_TABLE", defaults.system_logs_table)?;

        Ok(Self {
            port: parse_var(&lookup, "PORT", defaults.port)?,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
            db_host: lookup("DB_HOST").unwrap_or(defaults.db_host),
            db_port: parse_var(&lookup, "DB_PORT", defaults.db_port)?,
            db_user: lookup("DB_USER").unwrap_or(defaults.db_user),
            db_password: lookup("DB_PASSWORD").unwrap_or(defaults.db_password),
            notes_database,
            systems_database,
            notes_table,
            system_logs_table,
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            require_store_on_startup: flag_var(
                &lookup,
                "DB_REQUIRE_ON_STARTUP",
                defaults.require_store_on_startup,
            )?,
        })
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Store configuration for one of the configured databases.
    pub fn store_config(&self, database: &str) -> StoreConfig {
        StoreConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: database.to_string(),
            max_connections: self.db_max_connections,
        }
    }

    /// Whether both collections live in one database.
    pub fn shares_database(&self) -> bool {
        self.notes_database == self.systems_database
    }

    /// The notes collection with its configured table.
    pub fn notes_spec(&self) -> Result<CollectionSpec, ConfigError> {
        CollectionSpec::notes()
            .with_table(&self.notes_table)
            .map_err(|e| ConfigError::invalid("NOTES_TABLE", e))
    }

    /// The system logs collection with its configured table.
    pub fn system_logs_spec(&self) -> Result<CollectionSpec, ConfigError> {
        CollectionSpec::system_logs()
            .with_table(&self.system_logs_table)
            .map_err(|e| ConfigError::invalid("SYSTEM_LOGS_TABLE", e))
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e| ConfigError::invalid(name, e)),
        None => Ok(default),
    }
}

fn flag_var<F>(lookup: &F, name: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) if v == "true" || v == "1" => Ok(true),
        Some(v) if v == "false" || v == "0" => Ok(false),
        Some(v) => Err(ConfigError::invalid(name, format!("expected true or false, got {v:?}"))),
    }
}

fn table_var<F>(lookup: &F, name: &str, default: String) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let table = lookup(name).unwrap_or(default);
    if is_valid_identifier(&table) {
        Ok(table)
    } else {
        Err(ConfigError::invalid(name, format!("{table:?} is not a plain identifier")))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl ConfigError {
    fn invalid(name: &str, reason: impl Display) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
