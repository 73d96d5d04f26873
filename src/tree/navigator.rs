//! Path-based navigation over a configuration tree.

use crate::tree::{ConfigPath, ConfigValue, TreeError};

/// Walk `tree` along `path` and return the node found there.
///
/// The empty path returns `tree` itself. A segment missing at any depth
/// yields `Ok(None)`. Descending through a scalar or list is an error.
pub fn show<'a>(
    tree: &'a ConfigValue,
    path: &ConfigPath,
) -> Result<Option<&'a ConfigValue>, TreeError> {
    walk(tree, path.segments(), 0)
}

fn walk<'a>(
    node: &'a ConfigValue,
    segments: &[String],
    depth: usize,
) -> Result<Option<&'a ConfigValue>, TreeError> {
    let Some(head) = segments.get(depth) else {
        return Ok(Some(node));
    };

    let ConfigValue::Object(map) = node else {
        return Err(TreeError::MalformedTree {
            path: segments[..depth].join(" "),
            found: node.kind(),
        });
    };

    match map.get(head) {
        None => Ok(None),
        Some(child) => walk(child, segments, depth + 1),
    }
}
