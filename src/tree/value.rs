//! Recursive configuration values.
//!
//! Remote tree nodes and desired write payloads share one representation.
//! Objects are backed by a `BTreeMap`, so iteration is always in sorted key
//! order and compiled batches are reproducible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Mapping of child name to child value, iterated in sorted key order.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A node of the configuration tree.
///
/// An `Object` with no entries is a presence flag: an option that exists
/// but carries no value (e.g. `service ssh`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Value", from = "Value")]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Multi-value node. Always treated as a single opaque leaf.
    List(Vec<ConfigValue>),
    Object(ConfigMap),
}

impl ConfigValue {
    /// The value written for a valueless option.
    pub fn presence_flag() -> Self {
        ConfigValue::Object(ConfigMap::new())
    }

    /// True for an empty object.
    pub fn is_presence_flag(&self) -> bool {
        matches!(self, ConfigValue::Object(map) if map.is_empty())
    }

    /// True for string, number and boolean values.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ConfigValue::Bool(_) | ConfigValue::Number(_) | ConfigValue::String(_)
        )
    }

    pub fn as_object(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::List(_) => "list",
            ConfigValue::Object(_) => "object",
        }
    }

    /// Parse JSON text into a value.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Value>(text).map(ConfigValue::from)
    }

    /// Parse a leaf given as command-line text.
    ///
    /// Input that opens like structured JSON (`{`, `[` or `"`) must decode;
    /// anything else that is not a JSON scalar is taken as a bare string.
    pub fn parse_leaf(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim_start().starts_with(['{', '[', '"']) {
            return Self::from_json_str(text);
        }
        Ok(Self::from_json_str(text).unwrap_or_else(|_| ConfigValue::String(text.to_string())))
    }

    /// Compact JSON text, with object keys in sorted order.
    pub fn to_json_string(&self) -> String {
        Value::from(self.clone()).to_string()
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(n) => ConfigValue::Number(n),
            Value::String(s) => ConfigValue::String(s),
            Value::Array(items) => ConfigValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                ConfigValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<ConfigValue> for Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Null => Value::Null,
            ConfigValue::Bool(b) => Value::Bool(b),
            ConfigValue::Number(n) => Value::Number(n),
            ConfigValue::String(s) => Value::String(s),
            ConfigValue::List(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            ConfigValue::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(n.into())
    }
}
