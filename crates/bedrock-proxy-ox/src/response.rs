//! Decoded response bodies.
//!
//! The proxy's responses are treated as opaque JSON. The wrappers only add
//! read-only accessors for the fields callers usually want.

use derive_more::{Deref, Into};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded body of `POST /v1/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Deref, Into)]
#[serde(transparent)]
pub struct ChatResponse(Value);

impl ChatResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// All entries of `choices`, empty if absent
    pub fn choices(&self) -> &[Value] {
        self.0
            .get("choices")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `choices[0].message.content` when it is a string, or its first text part
    pub fn content(&self) -> Option<&str> {
        let content = self.choices().first()?.get("message")?.get("content")?;
        match content {
            Value::String(text) => Some(text.as_str()),
            Value::Array(parts) => parts.iter().find_map(|part| part.get("text")?.as_str()),
            _ => None,
        }
    }

    /// `choices[0].finish_reason`
    pub fn finish_reason(&self) -> Option<&str> {
        self.choices().first()?.get("finish_reason")?.as_str()
    }

    /// The `usage` object, as returned
    pub fn usage(&self) -> Option<&Value> {
        self.0.get("usage")
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id")?.as_str()
    }

    pub fn model(&self) -> Option<&str> {
        self.0.get("model")?.as_str()
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Decoded body of `GET /v1/models`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Deref, Into)]
#[serde(transparent)]
pub struct ModelsResponse(Value);

impl ModelsResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Model identifiers, in the order the proxy listed them
    ///
    /// Accepts the OpenAI shape `{"data": [{"id": ..}]}` as well as a bare
    /// array of objects or strings.
    pub fn ids(&self) -> Vec<&str> {
        let entries = match &self.0 {
            Value::Array(items) => items.as_slice(),
            other => other
                .get("data")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        };

        entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(id) => Some(id.as_str()),
                other => other.get("id")?.as_str(),
            })
            .collect()
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}
