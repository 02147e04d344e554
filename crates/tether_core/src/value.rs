//! Values crossing the host boundary
//!
//! The host framework speaks loosely-typed JSON. Everything in this module is
//! the vocabulary both sides agree on: the value itself, inbound messages,
//! change callbacks, and the hints an adapter reports back to the host.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// The host's loosely-typed value representation
pub type HostValue = Value;

/// Payload-free change notification: "value changed, re-read it"
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Color used whenever a color value is missing or unusable
pub const DEFAULT_COLOR: &str = "#000000";

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern is valid")
});

/// Check for `#` followed by exactly six hex digits
pub fn is_hex_color(text: &str) -> bool {
    HEX_COLOR.is_match(text)
}

/// JSON type name for diagnostics
pub fn json_type_name(value: &HostValue) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// How the host should interpret a binding's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Free-form text
    Text,
    /// Let the host infer the type (arrays, null)
    Untyped,
}

impl ValueKind {
    /// Type string handed to the host; `None` asks it to infer
    pub const fn type_hint(self) -> Option<&'static str> {
        match self {
            Self::Text => Some(""),
            Self::Untyped => None,
        }
    }
}

/// Rate limiting mode the host can apply to change events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateMode {
    Debounce,
    Throttle,
}

/// Rate limiting requested by a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePolicy {
    pub mode: RateMode,
    pub delay_ms: u32,
}

/// An update delivered by the host to one bound element
///
/// A `value` key is honored even when its value is `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputMessage(Map<String, Value>);

impl InputMessage {
    pub const VALUE: &'static str = "value";
    pub const LABEL: &'static str = "label";

    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a message from JSON text; non-object payloads are rejected
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Builder-style field insertion
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn with_value(self, value: impl Into<Value>) -> Self {
        self.with(Self::VALUE, value)
    }

    pub fn with_label(self, label: impl Into<Value>) -> Self {
        self.with(Self::LABEL, label)
    }

    /// The `value` field, if the message carries one
    pub fn value(&self) -> Option<&HostValue> {
        self.0.get(Self::VALUE)
    }

    pub fn has_label(&self) -> bool {
        self.0.contains_key(Self::LABEL)
    }

    /// The `label` field as text; `null` or non-string labels clear it
    pub fn label(&self) -> Option<&str> {
        self.0.get(Self::LABEL).and_then(Value::as_str)
    }

    /// Fields other than `value` and `label`
    pub fn extra_fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|k| *k != Self::VALUE && *k != Self::LABEL)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for InputMessage {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl fmt::Display for InputMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("{..}"),
        }
    }
}
