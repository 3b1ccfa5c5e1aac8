//! Show the fields parsed from a schema file.

use color_eyre::eyre::{Result, WrapErr, eyre};
use mog_core::schema::FieldDescriptor;
use mog_core::schema::parser;
use std::fs;
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};

use crate::ParseArgs;

/// Row for the fields table.
#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Line")]
    line: usize,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Type")]
    type_name: String,
    #[tabled(rename = "Enum")]
    enum_list: String,
    #[tabled(rename = "Args")]
    args: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&FieldDescriptor> for FieldRow {
    fn from(field: &FieldDescriptor) -> Self {
        Self {
            line: field.line_number,
            path: field.path.to_string(),
            type_name: format!("@{}", field.type_name),
            enum_list: field.enum_list.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            args: field.args.to_string(),
            comment: field.comment.clone().unwrap_or_default(),
        }
    }
}

pub fn run(config: Option<&Path>, args: &ParseArgs) -> Result<()> {
    super::load_config(config)?;

    let source = fs::read_to_string(&args.file)
        .wrap_err_with(|| format!("Failed to read schema {}", args.file.display()))?;
    let fields = parser::parse(&source).map_err(|e| eyre!("{}: {e}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    if fields.is_empty() {
        println!("No fields in {}", args.file.display());
        return Ok(());
    }

    let rows: Vec<FieldRow> = fields.iter().map(FieldRow::from).collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!("\nTotal: {} fields", rows.len());
    Ok(())
}
