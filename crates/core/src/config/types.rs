use std::path::PathBuf;

use serde::Deserialize;

use crate::schema::DEFAULT_MAX_DEPTH;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub version: u32,
    /// Directory of `<TypeName>.mog` files registered as named types.
    pub schemas_dir: Option<String>,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// How deeply schema types may nest within one validation.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { max_depth: default_max_depth() }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The file the settings came from; `None` when running on defaults.
    pub source: Option<PathBuf>,
    pub schemas_dir: PathBuf,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}
