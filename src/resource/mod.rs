//! Managed configuration resources.
//!
//! A resource is one path of the device configuration whose whole subtree
//! is owned by a declarative client. Its identifier is the path's wire form.
//!
//! # Lifecycle
//! ```text
//! create  → refuse if something exists, then set every leaf
//! read    → current subtree as compact JSON
//! update  → delete the subtree and rebuild it in one batch
//! delete  → remove the subtree
//! import  → adopt an existing path by id
//! ```

use std::sync::Arc;

use thiserror::Error;

use crate::cache::ConfigCache;
use crate::patch::PatchError;
use crate::tree::{ConfigPath, ConfigValue, PathError};

/// Errors raised by the resource lifecycle.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Create was asked for a path that is already configured.
    #[error(
        "configuration path '{path}' already exists, try a resource import instead: {existing}"
    )]
    AlreadyExists { path: String, existing: String },

    #[error(transparent)]
    Cache(#[from] crate::Error),
}

impl From<PathError> for ResourceError {
    fn from(e: PathError) -> Self {
        ResourceError::Cache(e.into())
    }
}

impl From<PatchError> for ResourceError {
    fn from(e: PatchError) -> Self {
        ResourceError::Cache(e.into())
    }
}

/// State of one managed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceState {
    pub id: String,
    pub path: String,
    /// Compact JSON of the subtree; `null` when nothing is configured.
    pub value: String,
}

/// Lifecycle operations for managed paths.
#[derive(Debug, Clone)]
pub struct ConfigResource {
    cache: Arc<ConfigCache>,
}

impl ConfigResource {
    pub fn new(cache: Arc<ConfigCache>) -> Self {
        Self { cache }
    }

    /// Configure `path` with `value` (JSON text); fails if it already exists.
    pub async fn create(&self, path: &str, value: &str) -> Result<ResourceState, ResourceError> {
        let config_path = ConfigPath::parse(path)?;
        let desired = ConfigValue::from_json_str(value).map_err(PatchError::from)?;

        tracing::info!(path = %config_path, "Reading path before create");
        if let Some(existing) = self.cache.show(&config_path).await? {
            return Err(ResourceError::AlreadyExists {
                path: config_path.to_wire(),
                existing: existing.to_json_string(),
            });
        }

        let ops = self.cache.compiler().compile_sets(&config_path, &desired)?;
        self.cache.apply(&ops).await?;

        tracing::info!(path = %config_path, value = %value, "Created configuration path");
        Ok(ResourceState {
            id: config_path.to_wire(),
            path: config_path.to_wire(),
            value: desired.to_json_string(),
        })
    }

    /// Current state of `path`.
    pub async fn read(&self, path: &str) -> Result<ResourceState, ResourceError> {
        let config_path = ConfigPath::parse(path)?;
        let current = self.cache.show(&config_path).await?;
        let value = current.unwrap_or(ConfigValue::Null).to_json_string();

        tracing::info!(path = %config_path, value = %value, "Read configuration path");
        Ok(ResourceState {
            id: config_path.to_wire(),
            path: config_path.to_wire(),
            value,
        })
    }

    /// Replace the subtree at `path` with `value` (JSON text).
    pub async fn update(&self, path: &str, value: &str) -> Result<ResourceState, ResourceError> {
        let config_path = ConfigPath::parse(path)?;
        let desired = ConfigValue::from_json_str(value).map_err(PatchError::from)?;
        let ops = self.cache.update_value(&config_path, &desired).await?;

        tracing::info!(path = %config_path, operations = ops.len(), "Updated configuration path");
        Ok(ResourceState {
            id: config_path.to_wire(),
            path: config_path.to_wire(),
            value: desired.to_json_string(),
        })
    }

    /// Remove the subtree at `path`.
    pub async fn delete(&self, path: &str) -> Result<(), ResourceError> {
        let config_path = ConfigPath::parse(path)?;
        self.cache.delete(&config_path).await?;
        tracing::debug!(path = %config_path, "Resource deleted");
        Ok(())
    }

    /// Adopt an existing path; the id is the path.
    pub async fn import(&self, id: &str) -> Result<ResourceState, ResourceError> {
        self.read(id).await
    }
}
