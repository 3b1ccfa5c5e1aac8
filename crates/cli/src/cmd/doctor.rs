use mog_core::config::loader::{ConfigLoader, default_config_path};
use mog_core::schema::SchemaRepository;
use std::path::Path;

use crate::logging;

pub fn run(config: Option<&Path>) {
    let rc = match ConfigLoader::load(config) {
        Ok(rc) => rc,
        Err(e) => {
            println!("FAIL mog doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&rc) {
        println!("FAIL mog doctor");
        println!("{e:#}");
        std::process::exit(1);
    }

    let schemas = match SchemaRepository::new(&rc.schemas_dir) {
        Ok(repo) => repo.list_all().len(),
        Err(e) => {
            println!("FAIL mog doctor");
            println!("{e}");
            std::process::exit(1);
        }
    };

    println!("OK   mog doctor");
    match &rc.source {
        Some(path) => println!("path: {}", path.display()),
        None => println!("path: (defaults, no file at {})", default_config_path().display()),
    }
    println!("schemas_dir: {}", rc.schemas_dir.display());
    println!("schemas: {schemas}");
    println!("validation.max_depth: {}", rc.validation.max_depth);
    println!("logging.level: {}", rc.logging.level);
    if let Some(file) = &rc.logging.file {
        println!("logging.file: {}", file.display());
    }
    tracing::debug!(schemas, "doctor finished");
}
