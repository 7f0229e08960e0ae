// ABOUTME: Typed option objects for the resize, convert and store commands
// ABOUTME: Each serializes to the JSON object sent under its command key

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMethod {
    Scale,
    Fit,
    Cover,
    Thumb,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResizeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ResizeMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ResizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method(mut self, method: ResizeMethod) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }
}

/// Target formats for conversion, tried in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertOptions {
    #[serde(rename = "type")]
    pub types: Vec<String>,
}

impl ConvertOptions {
    pub fn to<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

/// Third-party storage settings. `service` comes first; provider fields follow
/// in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    fields: Map<String, Value>,
}

impl StoreOptions {
    pub fn new(service: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("service".to_string(), Value::String(service.into()));
        Self { fields }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn service(&self) -> Option<&str> {
        self.fields.get("service").and_then(Value::as_str)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
