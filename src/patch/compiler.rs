//! Compilation of structured writes into primitive operation batches.

use serde::Serialize;

use crate::patch::flatten::{flatten_with, NullPolicy};
use crate::patch::PatchError;
use crate::tree::{ConfigPath, ConfigValue};

/// One primitive mutation, always submitted as part of a batch.
///
/// Serializes to the batch wire form:
/// `{"op": "set", "path": [..], "value": ..}` or `{"op": "delete", "path": [..]}`.
/// A presence-flag `Set` carries no `value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Set {
        path: ConfigPath,
        #[serde(skip_serializing_if = "ConfigValue::is_presence_flag")]
        value: ConfigValue,
    },
    Delete {
        path: ConfigPath,
    },
}

impl Operation {
    pub fn path(&self) -> &ConfigPath {
        match self {
            Operation::Set { path, .. } | Operation::Delete { path } => path,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Operation::Delete { .. })
    }
}

/// Turns `(target path, desired value)` into an ordered batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchCompiler {
    nulls: NullPolicy,
}

impl PatchCompiler {
    pub fn new(nulls: NullPolicy) -> Self {
        Self { nulls }
    }

    /// Parse `desired` as JSON and compile a full replacement of `target`.
    pub fn compile(
        &self,
        target: &ConfigPath,
        desired: &str,
    ) -> Result<Vec<Operation>, PatchError> {
        let value = ConfigValue::from_json_str(desired)?;
        self.compile_value(target, &value)
    }

    /// Compile a full replacement of `target`: one delete of the existing
    /// subtree, then one set per flattened leaf.
    pub fn compile_value(
        &self,
        target: &ConfigPath,
        desired: &ConfigValue,
    ) -> Result<Vec<Operation>, PatchError> {
        let sets = self.compile_sets(target, desired)?;

        let mut ops = Vec::with_capacity(sets.len() + 1);
        ops.push(Operation::Delete {
            path: target.clone(),
        });
        ops.extend(sets);
        Ok(ops)
    }

    /// Compile only the set operations for `desired` under `target`.
    ///
    /// Used when nothing exists at `target` yet, since deleting a missing
    /// node fails on the remote.
    pub fn compile_sets(
        &self,
        target: &ConfigPath,
        desired: &ConfigValue,
    ) -> Result<Vec<Operation>, PatchError> {
        if target.is_root() {
            return Err(PatchError::RootTarget);
        }

        let ops = flatten_with(desired, self.nulls)?
            .into_iter()
            .map(|(relative, value)| Operation::Set {
                path: target.join(&relative),
                value,
            })
            .collect();
        Ok(ops)
    }
}

/// Compile with the default null policy.
pub fn compile(target: &ConfigPath, desired: &str) -> Result<Vec<Operation>, PatchError> {
    PatchCompiler::default().compile(target, desired)
}
