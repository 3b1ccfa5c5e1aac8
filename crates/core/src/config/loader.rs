use crate::config::types::{ConfigFile, LoggingConfig, ResolvedConfig, ValidationConfig};
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("validation.max_depth must be at least 1")]
    InvalidDepth,

    #[error("cannot expand path '{0}'")]
    BadPath(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// An explicit `config_path` must exist. Without one, the default
    /// location is tried and built-in defaults are used if it is absent.
    pub fn load(config_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = default_config_path();
                if !p.exists() {
                    tracing::debug!(path = %p.display(), "no config file, using defaults");
                    return Ok(Self::defaults());
                }
                p
            }
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.validation.max_depth == 0 {
            return Err(ConfigError::InvalidDepth);
        }

        Self::resolve(&path, &cf)
    }

    /// Settings used when no config file exists.
    pub fn defaults() -> ResolvedConfig {
        ResolvedConfig {
            source: None,
            schemas_dir: default_schemas_dir(),
            validation: ValidationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    fn resolve(path: &Path, cf: &ConfigFile) -> Result<ResolvedConfig, ConfigError> {
        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let sub = |s: &str| s.replace("{{config_dir}}", &config_dir.to_string_lossy());

        let schemas_dir = match &cf.schemas_dir {
            Some(dir) => relative_to(config_dir, expand_path(&sub(dir))?),
            None => default_schemas_dir(),
        };

        // Resolve log file path if present
        let logging = if let Some(ref file) = cf.logging.file {
            let expanded_file = expand_path(&sub(&file.to_string_lossy()))?;
            LoggingConfig {
                level: cf.logging.level.clone(),
                file_level: cf.logging.file_level.clone(),
                file: Some(relative_to(config_dir, expanded_file)),
            }
        } else {
            cf.logging.clone()
        };

        Ok(ResolvedConfig {
            source: Some(path.to_path_buf()),
            schemas_dir,
            validation: cf.validation.clone(),
            logging,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    config_home().join("mog").join("config.toml")
}

/// Default directory for schema files.
/// Global location: ~/.config/mog/schemas/
pub fn default_schemas_dir() -> PathBuf {
    config_home().join("mog").join("schemas")
}

fn config_home() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::BadPath(input.to_string()))?;
    Ok(PathBuf::from(expanded.to_string()))
}

fn relative_to(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() { path } else { base.join(path) }
}
