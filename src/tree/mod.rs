//! Configuration tree model and navigation.
//!
//! # Data Flow
//! ```text
//! remote showConfig response
//!     → value.rs (ConfigValue, sorted objects)
//!     → ConfigTree (Present root object, or Absent)
//!     → navigator.rs (walk by ConfigPath segments)
//!     → subtree view for the caller
//! ```
//!
//! # Design Decisions
//! - Values are a closed sum type; navigation matches on variants
//! - Paths stay as segment sequences until they reach the wire
//! - A missing node is `Ok(None)`, never an error

pub mod navigator;
pub mod path;
pub mod value;

use thiserror::Error;

pub use navigator::show;
pub use path::ConfigPath;
pub use value::{ConfigMap, ConfigValue};

/// Snapshot of the whole remote configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigTree {
    /// Root object of the configuration.
    Present(ConfigValue),
    /// The remote reported that no configuration exists.
    Absent,
}

impl ConfigTree {
    /// Read-only view of the subtree at `path`.
    ///
    /// An absent tree contains nothing, including at the root.
    pub fn show(&self, path: &ConfigPath) -> Result<Option<&ConfigValue>, TreeError> {
        match self {
            ConfigTree::Present(root) => navigator::show(root, path),
            ConfigTree::Absent => Ok(None),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ConfigTree::Absent)
    }
}

/// Errors raised while building paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path segments must not be empty")]
    EmptySegment,

    /// The segment would split in two when joined into the wire form.
    #[error("path segment {0:?} contains the path delimiter")]
    DelimiterInSegment(String),
}

/// Errors raised while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A node that must be a container holds a leaf while segments remain.
    #[error("malformed configuration tree at '{path}': expected object, found {found}")]
    MalformedTree { path: String, found: &'static str },
}
