//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::patch::NullPolicy;

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Device API connection settings.
    pub remote: RemoteConfig,

    /// What happens after a successful mutation.
    pub persistence: PersistenceConfig,

    /// Patch compilation settings.
    pub patch: PatchConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Device API connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the HTTP API (e.g., "https://192.168.1.1").
    pub endpoint: String,

    /// API key sent with every request.
    pub api_key: String,

    /// Accept self-signed certificates.
    pub insecure_tls: bool,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            // Devices ship with self-signed certificates.
            insecure_tls: true,
            timeout_secs: 600,
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Leave changes in the running configuration only.
    pub skip_saving: bool,

    /// Save to this file instead of the default location.
    pub save_file: Option<String>,
}

impl PersistenceConfig {
    /// Resolve the three-way persistence mode.
    pub fn mode(&self) -> PersistenceMode {
        if self.skip_saving {
            return PersistenceMode::Skip;
        }
        match &self.save_file {
            Some(file) => PersistenceMode::SaveToFile(file.clone()),
            None => PersistenceMode::SaveDefault,
        }
    }
}

/// What is persisted after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PersistenceMode {
    Skip,
    #[default]
    SaveDefault,
    SaveToFile(String),
}

/// Patch compilation settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PatchConfig {
    /// Treatment of `null` in desired values.
    pub null_values: NullPolicy,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "vyos_config=info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert!(config.remote.insecure_tls);
        assert_eq!(config.remote.timeout_secs, 600);
        assert_eq!(config.persistence.mode(), PersistenceMode::SaveDefault);
        assert_eq!(config.patch.null_values, NullPolicy::PresenceFlag);
    }

    #[test]
    fn test_persistence_modes() {
        let mut persistence = PersistenceConfig {
            skip_saving: false,
            save_file: Some("/config/test.boot".into()),
        };
        assert_eq!(
            persistence.mode(),
            PersistenceMode::SaveToFile("/config/test.boot".into())
        );

        persistence.skip_saving = true;
        assert_eq!(persistence.mode(), PersistenceMode::Skip);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            [remote]
            endpoint = "https://router.lan"
            api_key = "key"

            [patch]
            null_values = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(config.remote.endpoint, "https://router.lan");
        assert_eq!(config.remote.timeout_secs, 600);
        assert_eq!(config.patch.null_values, NullPolicy::Reject);
    }
}
