// ABOUTME: Operation request and response values exchanged with the request engine
// ABOUTME: Requests are immutable after construction; payloads are empty, JSON or raw bytes

use bytes::Bytes;
use http::{HeaderMap, Method};
use serde_json::{Map, Value};

use crate::constants::headers;

/// Body of an operation request
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    #[default]
    Empty,
    /// Ordered command object, encoded compactly in insertion order
    Json(Map<String, Value>),
    /// Raw image bytes, sent without a content type
    Raw(Bytes),
}

impl Payload {
    /// Encoded body and content type, or `None` when nothing should be sent
    pub(crate) fn encode(&self) -> Option<(Bytes, Option<&'static str>)> {
        match self {
            Payload::Empty => None,
            Payload::Json(map) if map.is_empty() => None,
            Payload::Json(map) => Some((
                Bytes::from(Value::Object(map.clone()).to_string()),
                Some(headers::JSON_CONTENT_TYPE),
            )),
            Payload::Raw(bytes) => Some((bytes.clone(), None)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    method: Method,
    target: String,
    payload: Payload,
}

impl OperationRequest {
    /// `target` is a path relative to the API base or an absolute URL.
    pub fn new(method: Method, target: impl Into<String>, payload: Payload) -> Self {
        Self {
            method,
            target: target.into(),
            payload,
        }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(Method::GET, target, Payload::Empty)
    }

    pub fn post(target: impl Into<String>, payload: Payload) -> Self {
        Self::new(Method::POST, target, payload)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

#[derive(Debug, Clone)]
pub struct OperationResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OperationResponse {
    /// Case-insensitive header lookup; non-UTF-8 values read as absent
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header(headers::LOCATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_empty_payloads_send_nothing() {
        assert!(Payload::Empty.encode().is_none());
        assert!(Payload::Json(Map::new()).encode().is_none());
    }

    #[test]
    fn test_json_payload_is_compact_and_ordered() {
        let mut map = Map::new();
        map.insert("resize".to_string(), json!({"width": 400}));
        map.insert("preserve".to_string(), json!(["copyright"]));

        let (body, content_type) = Payload::Json(map).encode().unwrap();
        assert_eq!(
            body,
            Bytes::from_static(br#"{"resize":{"width":400},"preserve":["copyright"]}"#)
        );
        assert_eq!(content_type, Some("application/json"));
    }

    #[test]
    fn test_raw_payload_has_no_content_type() {
        let (body, content_type) = Payload::Raw(Bytes::from_static(b"png file"))
            .encode()
            .unwrap();
        assert_eq!(body, Bytes::from_static(b"png file"));
        assert_eq!(content_type, None);
    }

    #[test]
    fn test_response_headers_are_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("location", HeaderValue::from_static("https://example.com/x"));
        let response = OperationResponse {
            status: 201,
            headers,
            body: Bytes::new(),
        };

        assert_eq!(response.header("LOCATION"), Some("https://example.com/x"));
        assert_eq!(response.location(), Some("https://example.com/x"));
        assert_eq!(response.header("image-width"), None);
    }
}
