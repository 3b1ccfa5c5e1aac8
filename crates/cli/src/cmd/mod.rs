pub mod check;
pub mod doctor;
pub mod parse;
pub mod types;

use color_eyre::eyre::{Result, WrapErr};
use mog_core::config::loader::ConfigLoader;
use mog_core::config::types::ResolvedConfig;
use mog_core::schema::{Mog, SchemaRepository};
use std::path::Path;

use crate::logging;

/// Load the configuration and install logging from it.
pub fn load_config(config: Option<&Path>) -> Result<ResolvedConfig> {
    let cfg = ConfigLoader::load(config)
        .wrap_err("Failed to load config\nRun 'mog doctor' to diagnose.")?;
    logging::init(&cfg)?;
    Ok(cfg)
}

/// A compiler configured from `cfg`, with every schema file in
/// `schemas_dir` registered as a type.
///
/// Returns the compiler and the names of the registered schema types.
pub fn compiler(cfg: &ResolvedConfig) -> Result<(Mog, Vec<String>)> {
    let mog = Mog::new().with_max_depth(cfg.validation.max_depth);
    let repo = SchemaRepository::new(&cfg.schemas_dir)
        .wrap_err_with(|| format!("Failed to scan {}", cfg.schemas_dir.display()))?;
    let names = repo.register_all(&mog)?;
    tracing::debug!(count = names.len(), dir = %cfg.schemas_dir.display(), "registered schema types");
    Ok((mog, names))
}
