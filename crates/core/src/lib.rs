//! Core library for mog: a compact schema DSL compiled into reusable validators.
//!
//! See [`schema`] for the DSL and [`schema::Mog`] for the compiler.

pub mod config;
pub mod schema;
pub mod value;

pub use schema::{CompiledSchema, Mog, SchemaError};
pub use value::Value;
