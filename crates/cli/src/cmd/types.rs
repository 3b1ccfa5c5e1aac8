//! List registered type names.

use color_eyre::eyre::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};

use crate::TypesArgs;

#[derive(Serialize, Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    name: String,
    #[tabled(rename = "Source")]
    source: &'static str,
}

pub fn run(config: Option<&Path>, args: &TypesArgs) -> Result<()> {
    let cfg = super::load_config(config)?;
    let (mog, discovered) = super::compiler(&cfg)?;

    let rows: Vec<TypeRow> = mog
        .registry()
        .type_names()
        .into_iter()
        .map(|name| {
            // A schema file may redefine a baseline type.
            let source = if discovered.contains(&name) { "schema file" } else { "baseline" };
            TypeRow { name, source }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!("\nSchemas dir: {}", cfg.schemas_dir.display());
    Ok(())
}
