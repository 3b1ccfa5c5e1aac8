//! Error types for schema compilation, registry lookups and validation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by compiling or invoking a schema.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// A non-blank line does not match the schema grammar.
    #[error("malformed schema line {line_number}: `{line}`")]
    MalformedLine { line_number: usize, line: String },

    /// A field references a type that is not registered.
    #[error("{report}")]
    UnknownType { type_name: String, report: String },

    /// A field's value was rejected by its validator.
    #[error("{0}")]
    Validation(ValidationFailure),

    /// Nested schema types recursed deeper than the configured limit.
    #[error("{report}")]
    DepthExceeded { limit: usize, report: String },
}

impl SchemaError {
    /// The rendered report for call-time errors.
    pub fn report(&self) -> Option<&str> {
        match self {
            Self::MalformedLine { .. } => None,
            Self::UnknownType { report, .. } | Self::DepthExceeded { report, .. } => Some(report),
            Self::Validation(failure) => Some(&failure.report),
        }
    }

    pub fn as_validation(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A single field failure, already rendered against its schema source.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    /// Dotted path of the failing field, root label included.
    pub path: String,
    pub type_name: String,
    pub line_number: usize,
    /// The validator's raw message.
    pub message: String,
    /// Message plus the annotated schema source.
    pub report: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.report)
    }
}

/// Registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown type: @{0}")]
    UnknownType(String),
}

/// Why a validator refused a value.
#[derive(Debug, Clone)]
pub enum Rejection {
    /// Plain descriptive message from a leaf validator.
    Message(String),
    /// Error raised by a nested schema.
    Schema(Box<SchemaError>),
    /// Entering another nested schema would pass the depth limit.
    TooDeep { limit: usize },
}

impl Rejection {
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

impl From<String> for Rejection {
    fn from(msg: String) -> Self {
        Self::Message(msg)
    }
}

impl From<&str> for Rejection {
    fn from(msg: &str) -> Self {
        Self::Message(msg.to_string())
    }
}

impl From<SchemaError> for Rejection {
    fn from(err: SchemaError) -> Self {
        Self::Schema(Box::new(err))
    }
}

/// Errors that can occur when discovering schema files.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Error walking the schemas directory.
    #[error("failed to read schemas directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    /// Error reading a schema file.
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A schema file does not compile.
    #[error("failed to compile schema {path}: {source}")]
    Compile {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },

    /// File stem is not usable as a type name.
    #[error("invalid schema type name in {0}")]
    InvalidName(PathBuf),
}
