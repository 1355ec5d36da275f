//! Block configuration values and field definitions
//!
//! Each block type declares the configuration fields a host has to render for
//! it. Values are written freely at edit time and only checked when the
//! pipeline runs (or when a pre-flight validation is requested).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration field definition
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConfigField {
    /// Key under which the value is stored in the block config
    pub key: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Field kind, used for rendering and range checks
    pub kind: FieldKind,
    /// Whether the block refuses to execute without this field
    pub required: bool,
}

impl ConfigField {
    pub(crate) const fn required(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
        }
    }

    pub(crate) const fn optional(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
        }
    }

    /// Check a present value against the field kind.
    ///
    /// Returns a human-readable warning when the value is outside the
    /// declared range or choices. Absence is not reported here.
    pub fn check(&self, value: &ConfigValue) -> Option<String> {
        match self.kind {
            FieldKind::Number { min, max } => match value.as_number() {
                Some(n) if n < min || n > max => Some(format!(
                    "'{}' is {} but should be between {} and {}",
                    self.key, n, min, max
                )),
                Some(_) => None,
                None => Some(format!("'{}' should be a number", self.key)),
            },
            FieldKind::Choice { options: choices } => match value.as_string() {
                Some(s) if choices.iter().any(|c| c.eq_ignore_ascii_case(s.trim())) => None,
                Some(s) => Some(format!(
                    "'{}' has unsupported value '{}' (expected one of: {})",
                    self.key,
                    s,
                    choices.join(", ")
                )),
                None => Some(format!("'{}' should be a string", self.key)),
            },
            FieldKind::Text | FieldKind::LongText | FieldKind::File => None,
        }
    }
}

/// Field kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text input
    Text,
    /// Multi-line text area
    LongText,
    /// Reference to an uploaded or recorded file
    File,
    /// One of a fixed set of values
    Choice { options: &'static [&'static str] },
    /// Number within an inclusive range
    Number { min: f64, max: f64 },
}

/// Configuration value stored on a block instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// String value
    String(String),
    /// Array of values
    Array(Vec<ConfigValue>),
    /// Object with key-value pairs
    Object(HashMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Whether the value counts as "not provided".
    ///
    /// Null, blank strings, and empty collections are empty. Numbers and
    /// booleans never are.
    pub fn is_empty(&self) -> bool {
        match self {
            ConfigValue::Null => true,
            ConfigValue::String(s) => s.trim().is_empty(),
            ConfigValue::Array(items) => items.is_empty(),
            ConfigValue::Object(map) => map.is_empty(),
            ConfigValue::Boolean(_) | ConfigValue::Integer(_) | ConfigValue::Number(_) => false,
        }
    }

    /// Try to convert to string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(n) => Some(*n),
            ConfigValue::Integer(i) => Some(*i as f64),
            ConfigValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Boolean(b)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Number(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::Array(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(map) => ConfigValue::Object(
                map.into_iter().map(|(k, v)| (k, ConfigValue::from(v))).collect(),
            ),
        }
    }
}
