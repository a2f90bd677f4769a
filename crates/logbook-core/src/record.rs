//! Records and the rules applied to request bodies.
//!
//! A [`Record`] is an ordered JSON object. Rows read from the store and
//! bodies received from clients both use it, so column order and body key
//! order survive the trip back to the client.

use serde_json::{Map, Value};

use crate::collection::{CollectionSpec, CreateEcho};
use crate::error::ValidationError;

/// One row or request body.
pub type Record = Map<String, Value>;

/// JavaScript truthiness of an optional JSON value.
///
/// Absent, `null`, `false`, `""` and any zero number are falsy. Everything
/// else is truthy, including `"0"`, `[]` and `{}`.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Check the required fields of a create body.
pub fn validate_create(spec: &CollectionSpec, body: &Record) -> Result<(), ValidationError> {
    if spec.required.iter().all(|field| is_truthy(body.get(*field))) {
        Ok(())
    } else {
        Err(ValidationError::MissingRequired(spec.required_message.to_string()))
    }
}

/// Column values for insert/update, in `spec.fields` order.
///
/// Absent keys become `null`.
pub fn column_values(spec: &CollectionSpec, body: &Record) -> Vec<Value> {
    spec.fields
        .iter()
        .map(|field| body.get(*field).cloned().unwrap_or(Value::Null))
        .collect()
}

/// Body returned to the client after a successful insert.
pub fn created_response(spec: &CollectionSpec, id: u64, body: &Record) -> Record {
    let mut response = Record::new();
    response.insert("id".to_string(), Value::from(id));

    match spec.echo {
        CreateEcho::Fields => {
            // Absent keys are left out, the same as an undefined property.
            for field in spec.fields {
                if let Some(value) = body.get(*field) {
                    response.insert((*field).to_string(), value.clone());
                }
            }
        }
        CreateEcho::RequestBody => {
            for (key, value) in body {
                response.insert(key.clone(), value.clone());
            }
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(-0.0), json!("")] {
            assert!(!is_truthy(Some(&falsy)), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-2.5), json!("0"), json!(" "), json!([]), json!({})] {
            assert!(is_truthy(Some(&truthy)), "{truthy} should be truthy");
        }
    }

    #[test]
    fn test_validate_note() {
        let spec = CollectionSpec::notes();
        let ok = record(json!({"title": "A", "date": "2024-01-01", "note": "text"}));
        assert!(validate_create(&spec, &ok).is_ok());

        let missing = record(json!({"title": "A", "date": "2024-01-01"}));
        let err = validate_create(&spec, &missing).unwrap_err();
        assert_eq!(err.to_string(), "Title, date, and note are required");

        let zero = record(json!({"title": 0, "date": "2024-01-01", "note": "text"}));
        assert!(validate_create(&spec, &zero).is_err());
    }

    #[test]
    fn test_validate_system_log_ignores_optional_fields() {
        let spec = CollectionSpec::system_logs();
        let body = record(json!({"sysNo": "S1", "date": "2024-01-01", "os": "Win10", "SerialNo": "X"}));
        assert!(validate_create(&spec, &body).is_ok());

        let body = record(json!({"sysNo": "S1", "date": "2024-01-01", "os": false, "SerialNo": "X"}));
        let err = validate_create(&spec, &body).unwrap_err();
        assert_eq!(err.to_string(), "sysNo, date, os, and SerialNo are required");
    }

    #[test]
    fn test_column_values_fill_nulls() {
        let spec = CollectionSpec::notes();
        let body = record(json!({"note": "n", "extra": 1, "title": "t"}));
        assert_eq!(column_values(&spec, &body), vec![json!("t"), json!(null), json!("n")]);
    }

    #[test]
    fn test_created_response_fields() {
        let spec = CollectionSpec::notes();
        let body = record(json!({"note": "text", "title": "A", "date": "2024-01-01", "extra": true}));
        let response = created_response(&spec, 1, &body);
        assert_eq!(
            Value::Object(response.clone()),
            json!({"id": 1, "title": "A", "date": "2024-01-01", "note": "text"})
        );
        let keys: Vec<_> = response.keys().cloned().collect();
        assert_eq!(keys, ["id", "title", "date", "note"]);
    }

    #[test]
    fn test_created_response_echoes_body() {
        let spec = CollectionSpec::system_logs();
        let body = record(json!({"sysNo": "S1", "date": "d", "os": "o", "SerialNo": "X", "custom": [1]}));
        let response = created_response(&spec, 7, &body);
        assert_eq!(
            Value::Object(response),
            json!({"id": 7, "sysNo": "S1", "date": "d", "os": "o", "SerialNo": "X", "custom": [1]})
        );
    }

    #[test]
    fn test_created_response_body_id_wins() {
        let spec = CollectionSpec::system_logs();
        let body = record(json!({"id": "client", "sysNo": "S1"}));
        let response = created_response(&spec, 7, &body);
        assert_eq!(response.get("id"), Some(&json!("client")));
        assert_eq!(response.keys().next().map(String::as_str), Some("id"));
    }
}
