//! VyOS configuration client library.
//!
//! Reads and writes a device configuration tree addressed by space-joined
//! key paths (`firewall name TEST default-action`). Reads go through a
//! whole-tree cache; structured writes are compiled into a delete followed
//! by ordered leaf sets and applied as one batch.

pub mod cache;
pub mod config;
pub mod error;
pub mod observability;
pub mod patch;
pub mod remote;
pub mod resource;
pub mod tree;

pub use cache::ConfigCache;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use patch::{Operation, PatchCompiler};
pub use remote::{HttpSession, RemoteSession};
pub use resource::ConfigResource;
pub use tree::{ConfigPath, ConfigTree, ConfigValue};
