//! End-to-end test against a running server backed by MySQL.
//!
//! ## Running
//!
//! ```bash
//! # Start the server first
//! cargo run --bin logbook-server
//!
//! # Run the test (in another terminal)
//! LOGBOOK_URL=http://localhost:3003 \
//!     cargo test -p logbook-server --test live_server -- --ignored --nocapture
//! ```

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
struct Message {
    message: String,
}

fn base_url() -> String {
    std::env::var("LOGBOOK_URL").unwrap_or_else(|_| "http://localhost:3003".to_string())
}

#[tokio::test]
#[ignore = "requires a running logbook-server and MySQL"]
async fn test_note_round_trip() {
    let client = Client::new();
    let base = base_url();

    let note = json!({"title": "live", "date": "2024-01-01", "note": "round trip"});
    let response = client
        .post(format!("{base}/notes"))
        .json(&note)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    let id = created["id"].as_u64().expect("assigned id");
    println!("Created note {id}");

    let fetched: Value = client
        .get(format!("{base}/notes/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["title"], "live");
    assert_eq!(fetched["note"], "round trip");

    let response = client
        .put(format!("{base}/notes/{id}"))
        .json(&json!({"title": "edited", "date": "2024-01-02", "note": "changed"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let message: Message = response.json().await.unwrap();
    assert_eq!(message.message, "Note updated successfully");

    let response = client
        .delete(format!("{base}/notes/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{base}/notes/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let message: Message = response.json().await.unwrap();
    assert_eq!(message.message, "Note not found");
}

#[tokio::test]
#[ignore = "requires a running logbook-server and MySQL"]
async fn test_system_log_round_trip() {
    let client = Client::new();
    let base = base_url();

    let log = json!({
        "sysNo": "LIVE-1",
        "date": "2024-03-05",
        "os": "Windows 11",
        "SerialNo": "SN-LIVE",
        "pcMode": "bench",
    });
    let response = client
        .post(format!("{base}/system-logs"))
        .json(&log)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["pcMode"], "bench");
    let id = created["id"].as_u64().expect("assigned id");

    let listed: Vec<Value> = client
        .get(format!("{base}/system-logs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(listed.iter().any(|row| row["id"] == id));

    let response = client
        .delete(format!("{base}/system-logs/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
