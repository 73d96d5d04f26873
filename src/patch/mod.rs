//! Patch compilation subsystem.
//!
//! # Data Flow
//! ```text
//! desired value (JSON text)
//!     → ConfigValue (DecodeError aborts here)
//!     → flatten.rs (sorted (relative path, leaf) pairs)
//!     → compiler.rs (Delete target, then Set target ++ relative)
//!     → batch submitted atomically by the remote session
//! ```
//!
//! # Design Decisions
//! - Full delete-then-recreate; no field-level diff against prior state
//! - Compilation is all-or-nothing: an error returns no operations
//! - Sorted key order makes batches reproducible

pub mod compiler;
pub mod flatten;

use thiserror::Error;

pub use compiler::{compile, Operation, PatchCompiler};
pub use flatten::{flatten, flatten_with, resolve_null, FlattenError, NullPolicy};

/// Errors raised while compiling a write.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The desired value is not valid JSON.
    #[error("invalid configuration value: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Flatten(#[from] FlattenError),

    /// Replacing the root would delete the whole configuration.
    #[error("refusing to replace the configuration root")]
    RootTarget,
}
