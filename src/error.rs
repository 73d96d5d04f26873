//! Crate-level error type.

use thiserror::Error;

use crate::patch::PatchError;
use crate::remote::RemoteError;
use crate::tree::{PathError, TreeError};

/// Errors surfaced by cache and resource operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid path: {0}")]
    Path(#[from] PathError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Patch(#[from] PatchError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result type for cache and resource operations.
pub type Result<T> = std::result::Result<T, Error>;
