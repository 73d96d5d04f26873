//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the API endpoint is a usable URL
//! - Validate value ranges (timeouts > 0, non-empty names)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::ClientConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a loaded configuration, collecting every error.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.remote.endpoint.is_empty() {
        errors.push(ValidationError::new(
            "remote.endpoint",
            "missing API endpoint; set it in the config file or VYOS_ENDPOINT",
        ));
    } else if let Err(e) = url::Url::parse(&config.remote.endpoint) {
        errors.push(ValidationError::new(
            "remote.endpoint",
            format!("invalid URL '{}': {}", config.remote.endpoint, e),
        ));
    }

    if config.remote.api_key.is_empty() {
        errors.push(ValidationError::new(
            "remote.api_key",
            "missing API key; set it in the config file or VYOS_API_KEY",
        ));
    }

    if config.remote.timeout_secs == 0 {
        errors.push(ValidationError::new("remote.timeout_secs", "must be greater than 0"));
    }

    if matches!(&config.persistence.save_file, Some(file) if file.trim().is_empty()) {
        errors.push(ValidationError::new("persistence.save_file", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
