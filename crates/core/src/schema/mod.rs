//! Schema DSL compiled into reusable validators.
//!
//! A schema is a block of lines, one field per line:
//!
//! ```text
//! cat          @Object
//! cat.fur      @String [black, white, orange, brown]  -- Cats have fur colour!
//! cat.lives    @Number { min : 1, max : 9 }           -- Lives remaining
//! cat.birthday @Date { opt }
//! ```
//!
//! - The path's first segment (`cat`) is a label for the value being checked;
//!   the rest of the path is looked up inside that value.
//! - `@Type` names a validator in the compiler's [`Registry`], resolved on
//!   every call so types can be added or replaced after compilation.
//! - `[...]` is an enum list forwarded to the validator.
//! - `{...}` holds flags and `key: value` options; `opt` lets a missing value pass.
//! - Anything after a dash is a comment.
//!
//! Compiled schemas can be registered as types themselves, which gives nested
//! and recursive schemas.

pub mod builtins;
pub mod compiler;
pub mod descriptor;
pub mod discovery;
pub mod errors;
pub mod middleware;
pub mod parser;
pub mod path;
pub mod registry;
pub mod report;
pub mod validator;

// Re-export commonly used types
pub use builtins::{
    DateValidator, EmailValidator, NumberValidator, ObjectValidator, StringValidator,
};
pub use compiler::{CompiledSchema, Invocation, Mog, Outcome, SchemaValidator};
pub use descriptor::{ArgValue, Args, FieldDescriptor, FieldPath, Literal};
pub use discovery::{SchemaInfo, SchemaRepository, discover_schemas};
pub use errors::{DiscoveryError, Rejection, RegistryError, SchemaError, ValidationFailure};
pub use middleware::{BAD_REQUEST, ChainableResponse, HeaderWriterResponse, Responder};
pub use registry::{BASELINE_TYPES, Registry, WeakRegistry};
pub use report::format_report;
pub use validator::{DEFAULT_MAX_DEPTH, FnValidator, ValidationContext, Validator};
