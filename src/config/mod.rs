//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (VYOS_ENDPOINT / VYOS_API_KEY fill empty fields)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Environment only fills gaps; the file wins, and explicit flags beat both

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    load_config, load_from_env, read_config_file, resolve_config, CliOverrides, ConfigError,
};
pub use schema::{
    ClientConfig, LoggingConfig, PatchConfig, PersistenceConfig, PersistenceMode, RemoteConfig,
};
