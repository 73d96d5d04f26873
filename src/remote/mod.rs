//! Remote device session.
//!
//! # Data Flow
//! ```text
//! ConfigCache
//!     → RemoteSession trait (fetch / set / delete / batch / save)
//!     → client.rs (HttpSession: form-encoded POST to the device API)
//!     → {success, data, error} envelope
//! ```
//!
//! # Design Decisions
//! - The session owns transport, authentication and timeouts
//! - No retries; every failure is returned to the caller unchanged
//! - Batches are applied by the device as one transaction

pub mod client;

use async_trait::async_trait;
use thiserror::Error;

use crate::patch::Operation;
use crate::tree::{ConfigPath, ConfigValue};

pub use client::HttpSession;

/// Error text the device returns when no configuration exists.
pub const EMPTY_TREE_SENTINEL: &str = "could not fetch config";

/// Errors reported by a remote session.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request could not be sent or the response not read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The device processed the request and reported a failure.
    #[error("remote API error: {0}")]
    Api(String),

    /// The device answered with something other than an API envelope.
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The envelope was well formed but the payload was not.
    #[error("unexpected response format: {0}")]
    UnexpectedResponse(String),
}

impl RemoteError {
    /// True when the error means "the device has no configuration".
    pub fn is_empty_tree_sentinel(&self) -> bool {
        matches!(self, RemoteError::Api(msg) if msg.contains(EMPTY_TREE_SENTINEL))
    }
}

/// Primitive operations against the managed device.
#[async_trait]
pub trait RemoteSession: Send + Sync {
    /// Fetch the whole configuration tree.
    async fn fetch_tree(&self) -> Result<ConfigValue, RemoteError>;

    /// Set one leaf.
    async fn set(&self, path: &ConfigPath, value: &ConfigValue) -> Result<(), RemoteError>;

    /// Delete one node and everything below it.
    async fn delete(&self, path: &ConfigPath) -> Result<(), RemoteError>;

    /// Apply `ops` in order as a single transaction.
    async fn submit_batch(&self, ops: &[Operation]) -> Result<(), RemoteError>;

    /// Persist the running configuration to the default location.
    async fn save(&self) -> Result<(), RemoteError>;

    /// Persist the running configuration to `file`.
    async fn save_to_file(&self, file: &str) -> Result<(), RemoteError>;
}
