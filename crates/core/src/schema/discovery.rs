//! Schema file discovery and loading.
//!
//! A schemas directory holds one `<TypeName>.mog` file per named type. Every
//! file is compiled and registered, so schemas can reference each other (and
//! themselves) by name regardless of load order.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::compiler::{CompiledSchema, Mog};
use super::errors::DiscoveryError;

/// File extension of schema files.
pub const SCHEMA_EXTENSION: &str = "mog";

/// A discovered schema file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaInfo {
    /// Type name, taken from the file stem.
    pub name: String,
    pub path: PathBuf,
}

/// Discover schema files in a directory (non-recursive), sorted by name.
///
/// Returns an empty list if the directory doesn't exist.
pub fn discover_schemas(root: &Path) -> Result<Vec<SchemaInfo>, DiscoveryError> {
    if !root.exists() {
        return Ok(vec![]);
    }

    let mut out = Vec::new();

    for entry in WalkDir::new(root).max_depth(1) {
        let entry =
            entry.map_err(|e| DiscoveryError::WalkError(root.display().to_string(), e))?;

        let path = entry.path();
        if !path.is_file() || !is_schema_file(path) {
            continue;
        }

        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        if !is_type_name(name) {
            return Err(DiscoveryError::InvalidName(path.to_path_buf()));
        }

        tracing::debug!(name, path = %path.display(), "discovered schema file");
        out.push(SchemaInfo { name: name.to_string(), path: path.to_path_buf() });
    }

    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

fn is_schema_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SCHEMA_EXTENSION)
}

/// Type names must be usable after `@` in schema text.
fn is_type_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Repository of schema files under one directory.
pub struct SchemaRepository {
    pub root: PathBuf,
    pub schemas: Vec<SchemaInfo>,
}

impl SchemaRepository {
    /// Discover the schema files under `root`.
    pub fn new(root: &Path) -> Result<Self, DiscoveryError> {
        let schemas = discover_schemas(root)?;
        Ok(Self { root: root.to_path_buf(), schemas })
    }

    pub fn list_all(&self) -> &[SchemaInfo] {
        &self.schemas
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.iter().any(|s| s.name == name)
    }

    /// Compile one schema file with `mog`, without registering it.
    pub fn load(&self, mog: &Mog, name: &str) -> Result<Option<CompiledSchema>, DiscoveryError> {
        match self.schemas.iter().find(|s| s.name == name) {
            Some(info) => load_schema_file(mog, &info.path).map(Some),
            None => Ok(None),
        }
    }

    /// Compile every schema file and register it under its type name.
    ///
    /// Returns the registered names.
    pub fn register_all(&self, mog: &Mog) -> Result<Vec<String>, DiscoveryError> {
        let mut names = Vec::with_capacity(self.schemas.len());
        for info in &self.schemas {
            let schema = load_schema_file(mog, &info.path)?;
            mog.add_schema(info.name.clone(), &schema);
            names.push(info.name.clone());
        }
        Ok(names)
    }
}

/// Read and compile a schema file.
pub fn load_schema_file(mog: &Mog, path: &Path) -> Result<CompiledSchema, DiscoveryError> {
    let source = fs::read_to_string(path)
        .map_err(|e| DiscoveryError::Io { path: path.to_path_buf(), source: e })?;

    mog.compile(&source)
        .map_err(|e| DiscoveryError::Compile { path: path.to_path_buf(), source: e })
}
