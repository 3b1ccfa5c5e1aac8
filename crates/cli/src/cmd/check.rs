//! Check a document against a schema file.

use color_eyre::eyre::{Result, WrapErr, eyre};
use mog_core::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::CheckArgs;

pub fn run(config: Option<&Path>, args: &CheckArgs) -> Result<()> {
    let cfg = super::load_config(config)?;
    let (mog, _) = super::compiler(&cfg)?;

    let source = fs::read_to_string(&args.schema)
        .wrap_err_with(|| format!("Failed to read schema {}", args.schema.display()))?;
    let schema = mog
        .compile(&source)
        .map_err(|e| eyre!("{}: {e}", args.schema.display()))?;

    let document = match &args.input {
        Some(path) => read_file(path)?,
        None => read_stdin()?,
    };

    match schema.check(document) {
        Ok(checked) => {
            println!("{}", serde_json::to_string_pretty(&checked)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.to_string().trim_end());
            std::process::exit(1);
        }
    }
}

fn read_file(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read input {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        parse_yaml(&text).wrap_err_with(|| format!("Invalid YAML in {}", path.display()))
    } else {
        parse_json(&text).wrap_err_with(|| format!("Invalid JSON in {}", path.display()))
    }
}

/// Stdin is tried as JSON first, then YAML.
fn read_stdin() -> Result<Value> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text).wrap_err("Failed to read stdin")?;

    match parse_json(&text) {
        Ok(value) => Ok(value),
        Err(json_err) => parse_yaml(&text)
            .map_err(|yaml_err| eyre!("stdin is neither JSON ({json_err}) nor YAML ({yaml_err})")),
    }
}

fn parse_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str::<serde_json::Value>(text).map(Value::from)
}

fn parse_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str::<serde_yaml::Value>(text).map(Value::from)
}
