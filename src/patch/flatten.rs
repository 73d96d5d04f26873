//! Flattening of nested values into leaf assignments.
//!
//! The remote set primitive only accepts one fully-qualified leaf at a
//! time, so a structured value is turned into `(relative path, leaf)`
//! pairs. Object keys are visited in sorted order; lists stay whole.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::{ConfigPath, ConfigValue, PathError};

/// One leaf assignment relative to the flattened value's root.
pub type FlatEntry = (ConfigPath, ConfigValue);

/// How a `null` in a desired value is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NullPolicy {
    /// Write `null` as a valueless option, like `{}`.
    #[default]
    PresenceFlag,
    /// Refuse values containing `null`.
    Reject,
}

/// Structural problems found while flattening.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    #[error("object key {key:?} under '{at}' cannot be a path segment: {source}")]
    InvalidKey {
        at: String,
        key: String,
        #[source]
        source: PathError,
    },

    #[error("null value at '{0}' is not allowed")]
    NullRejected(String),
}

/// Flatten `value` with the default null policy.
pub fn flatten(value: &ConfigValue) -> Result<Vec<FlatEntry>, FlattenError> {
    flatten_with(value, NullPolicy::default())
}

/// Flatten `value` into leaf assignments in sorted key order.
pub fn flatten_with(
    value: &ConfigValue,
    nulls: NullPolicy,
) -> Result<Vec<FlatEntry>, FlattenError> {
    let mut out = Vec::new();
    collect(value, &ConfigPath::root(), nulls, &mut out)?;
    Ok(out)
}

/// Decide what a `null` found at `at` becomes.
pub fn resolve_null(at: &ConfigPath, nulls: NullPolicy) -> Result<ConfigValue, FlattenError> {
    match nulls {
        NullPolicy::PresenceFlag => Ok(ConfigValue::presence_flag()),
        NullPolicy::Reject => Err(FlattenError::NullRejected(at.to_wire())),
    }
}

fn collect(
    value: &ConfigValue,
    prefix: &ConfigPath,
    nulls: NullPolicy,
    out: &mut Vec<FlatEntry>,
) -> Result<(), FlattenError> {
    match value {
        ConfigValue::Object(map) if map.is_empty() => {
            out.push((prefix.clone(), ConfigValue::presence_flag()));
        }
        ConfigValue::Object(map) => {
            // BTreeMap iteration is the sorted-key order.
            for (key, child) in map {
                let path = prefix
                    .child(key.as_str())
                    .map_err(|source| FlattenError::InvalidKey {
                        at: prefix.to_wire(),
                        key: key.clone(),
                        source,
                    })?;
                collect(child, &path, nulls, out)?;
            }
        }
        ConfigValue::Null => {
            out.push((prefix.clone(), resolve_null(prefix, nulls)?));
        }
        leaf => out.push((prefix.clone(), leaf.clone())),
    }
    Ok(())
}
