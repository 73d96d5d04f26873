//! Read-through cache of the remote configuration tree.
//!
//! # Data Flow
//! ```text
//! show(path)
//!     → get_full_config (slot empty? fetch under the lock)
//!     → tree::navigator walks the snapshot
//!
//! set / delete / update
//!     → invalidate (slot cleared under the lock)
//!     → RemoteSession primitive or batch
//!     → persistence per PersistenceMode
//! ```
//!
//! # Design Decisions
//! - One slot, one lock; invalidation is all-or-nothing
//! - The lock is held across the fetch on a miss, so concurrent readers
//!   wait for a single fetch instead of issuing their own
//! - The lock does not span invalidate + mutate + persist. Two concurrent
//!   writers may interleave their remote effects, and a reader may refill
//!   the slot between a writer's invalidation and its remote call. The
//!   device's own ordering is authoritative.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::{ClientConfig, PersistenceMode};
use crate::error::Result;
use crate::observability::metrics;
use crate::patch::{Operation, PatchCompiler};
use crate::remote::{HttpSession, RemoteError, RemoteSession};
use crate::tree::{ConfigPath, ConfigTree, ConfigValue};

/// Cached view of one device's configuration.
pub struct ConfigCache {
    session: Arc<dyn RemoteSession>,
    persistence: PersistenceMode,
    compiler: PatchCompiler,
    slot: Mutex<Option<Arc<ConfigTree>>>,
}

impl ConfigCache {
    /// Create an empty cache in front of `session`.
    pub fn new(session: Arc<dyn RemoteSession>, persistence: PersistenceMode) -> Self {
        Self {
            session,
            persistence,
            compiler: PatchCompiler::default(),
            slot: Mutex::new(None),
        }
    }

    /// Replace the patch compiler used by `update`.
    pub fn with_compiler(mut self, compiler: PatchCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Build a cache backed by an HTTP session from client configuration.
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, RemoteError> {
        let session = HttpSession::new(&config.remote)?;
        tracing::info!(
            endpoint = %config.remote.endpoint,
            persistence = ?config.persistence.mode(),
            "Configuration cache created"
        );
        Ok(Self::new(Arc::new(session), config.persistence.mode())
            .with_compiler(PatchCompiler::new(config.patch.null_values)))
    }

    pub fn compiler(&self) -> &PatchCompiler {
        &self.compiler
    }

    /// The whole tree, fetched on first use or after invalidation.
    pub async fn get_full_config(&self) -> Result<Arc<ConfigTree>> {
        let mut slot = self.slot.lock().await;
        if let Some(tree) = slot.as_ref() {
            metrics::record_cache_lookup(true);
            return Ok(Arc::clone(tree));
        }

        metrics::record_cache_lookup(false);
        tracing::debug!("Configuration cache miss, fetching remote tree");

        let tree = Arc::new(self.fetch_tree().await?);
        *slot = Some(Arc::clone(&tree));
        Ok(tree)
    }

    async fn fetch_tree(&self) -> Result<ConfigTree> {
        match self.session.fetch_tree().await {
            Ok(ConfigValue::Null) => {
                metrics::record_remote_fetch("empty");
                Ok(ConfigTree::Absent)
            }
            Ok(root @ ConfigValue::Object(_)) => {
                metrics::record_remote_fetch("ok");
                Ok(ConfigTree::Present(root))
            }
            Ok(other) => {
                metrics::record_remote_fetch("error");
                Err(RemoteError::UnexpectedResponse(format!(
                    "configuration root is a {}, expected an object",
                    other.kind()
                ))
                .into())
            }
            Err(e) if e.is_empty_tree_sentinel() => {
                metrics::record_remote_fetch("empty");
                tracing::debug!(error = %e, "Remote reports no configuration");
                Ok(ConfigTree::Absent)
            }
            Err(e) => {
                metrics::record_remote_fetch("error");
                tracing::warn!(error = %e, "Failed to fetch remote configuration");
                Err(e.into())
            }
        }
    }

    /// Drop the cached tree.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
        metrics::record_invalidation();
        tracing::debug!("Configuration cache invalidated");
    }

    /// The subtree at `path`, or `None` if nothing is configured there.
    pub async fn show(&self, path: &ConfigPath) -> Result<Option<ConfigValue>> {
        let tree = self.get_full_config().await?;
        Ok(tree.show(path)?.cloned())
    }

    /// Set one leaf on the device.
    pub async fn set(&self, path: &ConfigPath, value: &ConfigValue) -> Result<()> {
        self.invalidate().await;
        self.session.set(path, value).await?;
        metrics::record_mutation("set");
        tracing::info!(path = %path, "Set configuration value");
        self.save_if_required().await
    }

    /// Delete the node at `path` and everything below it.
    pub async fn delete(&self, path: &ConfigPath) -> Result<()> {
        self.invalidate().await;
        self.session.delete(path).await?;
        metrics::record_mutation("delete");
        tracing::info!(path = %path, "Deleted configuration path");
        self.save_if_required().await
    }

    /// Replace the subtree at `path` with `desired` (JSON text).
    ///
    /// Nothing reaches the device if `desired` fails to compile.
    pub async fn update(&self, path: &ConfigPath, desired: &str) -> Result<Vec<Operation>> {
        let ops = self.compiler.compile(path, desired)?;
        self.apply(&ops).await?;
        Ok(ops)
    }

    /// Replace the subtree at `path` with an already parsed value.
    pub async fn update_value(
        &self,
        path: &ConfigPath,
        desired: &ConfigValue,
    ) -> Result<Vec<Operation>> {
        let ops = self.compiler.compile_value(path, desired)?;
        self.apply(&ops).await?;
        Ok(ops)
    }

    /// Submit a compiled batch as one transaction.
    pub async fn apply(&self, ops: &[Operation]) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }

        self.invalidate().await;
        tracing::info!(operations = ops.len(), "Submitting configuration batch");
        self.session.submit_batch(ops).await?;
        metrics::record_mutation("batch");
        metrics::record_batch(ops.len());
        self.save_if_required().await
    }

    async fn save_if_required(&self) -> Result<()> {
        match &self.persistence {
            PersistenceMode::Skip => Ok(()),
            PersistenceMode::SaveDefault => {
                self.session.save().await?;
                tracing::debug!("Saved configuration");
                Ok(())
            }
            PersistenceMode::SaveToFile(file) => {
                self.session.save_to_file(file).await?;
                tracing::debug!(file = %file, "Saved configuration to file");
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for ConfigCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCache")
            .field("persistence", &self.persistence)
            .field("compiler", &self.compiler)
            .finish()
    }
}
