//! MySQL-backed store tests.
//!
//! These need a reachable MySQL server and are ignored by default:
//!
//! ```bash
//! DB_HOST=127.0.0.1 DB_USER=root DB_PASSWORD= DB_NAME=logbook_test \
//!     cargo test -p logbook-store --test mysql_store -- --ignored
//! ```
//!
//! Each test creates and drops its own table.

use logbook_core::CollectionSpec;
use logbook_store::{MySqlStore, RecordStore, StoreConfig, StoreError};
use serde_json::{Value, json};

fn config_from_env() -> StoreConfig {
    let defaults = StoreConfig::default();
    StoreConfig {
        host: std::env::var("DB_HOST").unwrap_or(defaults.host),
        port: std::env::var("DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port),
        user: std::env::var("DB_USER").unwrap_or(defaults.user),
        password: std::env::var("DB_PASSWORD").unwrap_or(defaults.password),
        database: std::env::var("DB_NAME").unwrap_or_else(|_| "logbook_test".to_string()),
        max_connections: 2,
    }
}

async fn notes_table(store: &MySqlStore, table: &str) -> CollectionSpec {
    sqlx::raw_sql(&format!(
        "DROP TABLE IF EXISTS `{table}`; \
         CREATE TABLE `{table}` ( \
             id INT AUTO_INCREMENT PRIMARY KEY, \
             title VARCHAR(255), \
             date DATE, \
             note TEXT \
         )"
    ))
    .execute(store.pool())
    .await
    .expect("create test table");

    CollectionSpec::notes().with_table(table).unwrap()
}

async fn drop_table(store: &MySqlStore, table: &str) {
    sqlx::raw_sql(&format!("DROP TABLE IF EXISTS `{table}`"))
        .execute(store.pool())
        .await
        .expect("drop test table");
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_note_lifecycle() {
    let store = MySqlStore::connect(&config_from_env()).await.unwrap();
    let spec = notes_table(&store, "logbook_it_notes").await;

    let id = store
        .insert(&spec, &[json!("A"), json!("2024-01-01"), json!("text")])
        .await
        .unwrap();

    let row = store.get(&spec, &id.to_string()).await.unwrap().unwrap();
    assert_eq!(
        Value::Object(row),
        json!({"id": id, "title": "A", "date": "2024-01-01", "note": "text"})
    );

    // Same values again still counts as a match.
    let values = [json!("A"), json!("2024-01-01"), json!("text")];
    assert_eq!(store.update(&spec, &id.to_string(), &values).await.unwrap(), 1);

    let values = [json!("B"), Value::Null, Value::Null];
    assert_eq!(store.update(&spec, &id.to_string(), &values).await.unwrap(), 1);
    let row = store.get(&spec, &id.to_string()).await.unwrap().unwrap();
    assert_eq!(row.get("title"), Some(&json!("B")));
    assert_eq!(row.get("note"), Some(&Value::Null));

    assert_eq!(store.list(&spec).await.unwrap().len(), 1);
    assert_eq!(store.delete(&spec, &id.to_string()).await.unwrap(), 1);
    assert_eq!(store.delete(&spec, &id.to_string()).await.unwrap(), 0);
    assert!(store.get(&spec, &id.to_string()).await.unwrap().is_none());

    drop_table(&store, "logbook_it_notes").await;
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_missing_table_reports_database_error() {
    let store = MySqlStore::connect(&config_from_env()).await.unwrap();
    let spec = CollectionSpec::notes()
        .with_table("logbook_it_missing")
        .unwrap();

    let err = store.list(&spec).await.unwrap_err();
    match &err {
        StoreError::Database { code, errno, sql, .. } => {
            assert_eq!(code, "ER_NO_SUCH_TABLE");
            assert_eq!(*errno, 1146);
            assert_eq!(sql.as_deref(), Some("SELECT * FROM `logbook_it_missing`"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.payload()["fatal"], false);
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MySQL server"]
async fn test_unreachable_server_is_unavailable() {
    let config = StoreConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..config_from_env()
    };
    let store = MySqlStore::connect_lazy(&config);
    let err = store.ping().await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}
