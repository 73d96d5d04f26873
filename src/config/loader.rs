//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable consulted when the endpoint is not configured.
pub const ENDPOINT_ENV: &str = "VYOS_ENDPOINT";
/// Environment variable consulted when the API key is not configured.
pub const API_KEY_ENV: &str = "VYOS_API_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl CliOverrides {
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.remote.endpoint = endpoint.clone();
        }
        if let Some(key) = &self.api_key {
            config.remote.api_key = key.clone();
        }
    }
}

/// Parse a TOML file without validating it.
pub fn read_config_file(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load a TOML file, fill gaps from the environment, and validate.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    finish(read_config_file(path)?, |name| std::env::var(name).ok())
}

/// Resolve the effective configuration.
///
/// Precedence: command-line flags, then the file, then the environment.
pub fn resolve_config(
    file: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<ClientConfig, ConfigError> {
    resolve_with(file, overrides, |name| std::env::var(name).ok())
}

fn resolve_with<F>(
    file: Option<&Path>,
    overrides: &CliOverrides,
    lookup: F,
) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match file {
        Some(path) => read_config_file(path)?,
        None => ClientConfig::default(),
    };
    overrides.apply(&mut config);
    finish(config, lookup)
}

/// Build a configuration from defaults and the environment only.
pub fn load_from_env() -> Result<ClientConfig, ConfigError> {
    finish(ClientConfig::default(), |name| std::env::var(name).ok())
}

fn finish<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Fill an empty endpoint or API key from the environment.
///
/// Values set in the file take precedence.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if config.remote.endpoint.is_empty() {
        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            config.remote.endpoint = endpoint;
        }
    }
    if config.remote.api_key.is_empty() {
        if let Some(key) = lookup(API_KEY_ENV) {
            config.remote.api_key = key;
        }
    }
}
