//! Configuration loading.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path, default_schemas_dir};
pub use types::{LoggingConfig, ResolvedConfig, ValidationConfig};
