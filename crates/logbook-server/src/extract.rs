//! JSON body extraction.
//!
//! Bodies are only parsed when the request declares `application/json`;
//! otherwise the handler sees an empty object. Create then fails validation
//! and update writes NULLs, which is what clients of this API expect.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, StatusCode, header},
};
use logbook_core::Record;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// A request body as a JSON object.
#[derive(Debug, Clone, Default)]
pub struct JsonBody(pub Record);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(request.headers()) {
            return Ok(Self::default());
        }

        let bytes = Bytes::from_request(request, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge(rejection.body_text())
            } else {
                ApiError::BadRequest(rejection.body_text())
            }
        })?;

        parse_body(&bytes).map(Self)
    }
}

/// Whether the media type is `application/json`, ignoring parameters.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// Parse a body into an object.
///
/// An empty body is `{}`. A top-level array carries no named fields and is
/// also treated as `{}`; any other top-level value is rejected.
fn parse_body(bytes: &[u8]) -> ApiResult<Record> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Record::new());
    }

    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Array(_)) => Ok(Record::new()),
        Ok(_) => Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(ApiError::BadRequest(format!("Invalid JSON body: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type(&headers("application/json")));
        assert!(is_json_content_type(&headers("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers("Application/JSON")));
        assert!(!is_json_content_type(&headers("text/plain")));
        assert!(!is_json_content_type(&headers("application/x-www-form-urlencoded")));
        assert!(!is_json_content_type(&HeaderMap::new()));
    }

    #[test]
    fn test_parse_object_keeps_key_order() {
        let record = parse_body(br#"{"note": "n", "title": "t"}"#).unwrap();
        let keys: Vec<_> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, ["note", "title"]);
    }

    #[test]
    fn test_parse_empty_and_array() {
        assert!(parse_body(b"").unwrap().is_empty());
        assert!(parse_body(b"  \n").unwrap().is_empty());
        assert!(parse_body(b"[1, 2]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_scalars_and_garbage() {
        assert!(matches!(parse_body(b"\"text\""), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_body(b"{\"title\": "), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_nested_values() {
        let record = parse_body(br#"{"notes": {"a": [1]}}"#).unwrap();
        assert_eq!(record.get("notes"), Some(&json!({"a": [1]})));
    }
}
