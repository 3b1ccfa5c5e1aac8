//! Schema compilation and invocation.

use std::sync::Arc;

use super::descriptor::{Args, FieldDescriptor, Literal};
use super::errors::{Rejection, SchemaError, ValidationFailure};
use super::middleware::{BAD_REQUEST, Responder};
use super::parser;
use super::path;
use super::registry::{Registry, WeakRegistry};
use super::report::format_report;
use super::validator::{DEFAULT_MAX_DEPTH, ValidationContext, Validator};
use crate::value::{Value, describe, is_missing};

/// Schema compiler owning a type registry.
///
/// ```
/// use mog_core::schema::Mog;
/// use mog_core::Value;
///
/// let m = Mog::new();
/// let cat = m.compile("
///     cat        @Object
///     cat.lives  @Number { min : 1, max : 9 }  -- Lives remaining
/// ").unwrap();
///
/// let checked = cat.check(Value::from(serde_json::json!({ "lives": "3" }))).unwrap();
/// assert_eq!(checked.get("lives"), Some(&Value::Number(3.0)));
/// ```
#[derive(Debug, Clone)]
pub struct Mog {
    registry: Registry,
    max_depth: usize,
}

impl Default for Mog {
    fn default() -> Self {
        Self::new()
    }
}

impl Mog {
    /// Create a compiler with a fresh registry holding the baseline types.
    pub fn new() -> Self {
        Self::with_registry(Registry::with_baseline())
    }

    /// Create a compiler over an existing registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self { registry, max_depth: DEFAULT_MAX_DEPTH }
    }

    /// Limit how deeply schema types may nest within one call.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse schema text into a reusable compiled schema.
    pub fn compile(&self, text: &str) -> Result<CompiledSchema, SchemaError> {
        let fields = parser::parse(text)?;
        tracing::debug!(fields = fields.len(), "compiled schema");
        Ok(CompiledSchema {
            fields: fields.into(),
            registry: self.registry.clone(),
            max_depth: self.max_depth,
        })
    }

    /// Register (or replace) a type.
    pub fn add(&self, name: impl Into<String>, validator: impl Validator + 'static) {
        self.registry.register(name, validator);
    }

    /// Register a closure as a type.
    pub fn add_fn<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Option<&Value>, &Args, &[Literal]) -> Result<Option<Value>, String>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register_fn(name, f);
    }

    /// Register a compiled schema as a named type.
    pub fn add_schema(&self, name: impl Into<String>, schema: &CompiledSchema) {
        self.registry.register_schema(name, schema);
    }
}

/// The three ways a compiled schema can be called.
pub enum Invocation<'a> {
    /// Validate in place and report failures as `Err`.
    Direct(&'a mut Value),
    /// Validate in place; continue with `next` or answer through `responder`.
    Middleware {
        value: &'a mut Value,
        responder: Responder<'a>,
        next: Box<dyn FnOnce() + 'a>,
    },
    /// Validate another schema's field in place, sharing its call state.
    Nested { value: &'a mut Value, cx: &'a mut ValidationContext },
}

/// What an invocation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Direct or nested call succeeded.
    Validated,
    /// Middleware call succeeded and `next` ran.
    Continued,
    /// Middleware call failed and the responder received the report.
    Rejected { status: u16 },
}

/// A compiled schema: parsed fields plus a handle to the registry.
///
/// Holds no per-call state; clone and share it freely.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    fields: Arc<[FieldDescriptor]>,
    registry: Registry,
    max_depth: usize,
}

impl CompiledSchema {
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The normalized schema text, if there is at least one field.
    pub fn source(&self) -> Option<&str> {
        self.fields.first().map(|f| &*f.source)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatch one invocation.
    ///
    /// Middleware invocations never return `Err`; failures go to the responder.
    pub fn invoke(&self, invocation: Invocation<'_>) -> Result<Outcome, SchemaError> {
        match invocation {
            Invocation::Direct(value) => {
                self.validate(value)?;
                Ok(Outcome::Validated)
            }
            Invocation::Middleware { value, responder, next } => {
                Ok(self.middleware(value, responder, next))
            }
            Invocation::Nested { value, cx } => {
                self.run(value, cx)?;
                Ok(Outcome::Validated)
            }
        }
    }

    /// Validate `value` in place, stopping at the first failing field.
    pub fn validate(&self, value: &mut Value) -> Result<(), SchemaError> {
        let mut cx = ValidationContext::new(self.registry.clone(), self.max_depth);
        self.run(value, &mut cx)
    }

    /// Validate an owned value and hand it back with coercions applied.
    pub fn check(&self, mut value: Value) -> Result<Value, SchemaError> {
        self.validate(&mut value)?;
        Ok(value)
    }

    /// Validate as request middleware: run `next` on success, otherwise send a
    /// 400 with the report through `responder`.
    pub fn middleware<'a>(
        &self,
        value: &'a mut Value,
        responder: Responder<'a>,
        next: impl FnOnce() + 'a,
    ) -> Outcome {
        match self.validate(value) {
            Ok(()) => {
                next();
                Outcome::Continued
            }
            Err(err) => {
                tracing::warn!(status = BAD_REQUEST, "rejecting request: {}", first_line(&err));
                let body = err.report().map_or_else(|| err.to_string(), str::to_string);
                responder.report_failure(BAD_REQUEST, &body);
                Outcome::Rejected { status: BAD_REQUEST }
            }
        }
    }

    fn run(&self, root: &mut Value, cx: &mut ValidationContext) -> Result<(), SchemaError> {
        for field in self.fields.iter() {
            let validator = self.registry.resolve(&field.type_name).map_err(|_| {
                tracing::warn!(type_name = %field.type_name, path = %field.path, "unknown type");
                SchemaError::UnknownType {
                    type_name: field.type_name.clone(),
                    report: format_report(field, &format!("unknown type @{}", field.type_name)),
                }
            })?;

            let target = path::get_mut(root, &field.path);
            if field.is_optional() && is_missing(target.as_deref()) {
                tracing::trace!(path = %field.path, "skipping missing optional field");
                continue;
            }

            tracing::trace!(path = %field.path, type_name = %field.type_name, "checking field");
            match validator.validate_in_place(target, &field.args, &field.enum_list, cx) {
                Ok(Some(coerced)) => {
                    path::set(root, &field.path, coerced);
                }
                Ok(None) => {}
                Err(rejection) => return Err(fail(field, rejection)),
            }
        }
        Ok(())
    }
}

/// Turn a validator's rejection into an error reported at `field`.
fn fail(field: &FieldDescriptor, rejection: Rejection) -> SchemaError {
    let message = match rejection {
        Rejection::Message(msg) => msg,
        Rejection::Schema(inner) => match *inner {
            // The nested report becomes this field's message.
            SchemaError::Validation(nested) => nested.report.trim_end().to_string(),
            other => return other,
        },
        Rejection::TooDeep { limit } => {
            return SchemaError::DepthExceeded {
                limit,
                report: format_report(
                    field,
                    &format!("schema types nested deeper than the limit of {limit}"),
                ),
            };
        }
    };

    tracing::debug!(path = %field.path, type_name = %field.type_name, "field failed validation");
    SchemaError::Validation(ValidationFailure {
        path: field.path.to_string(),
        type_name: field.type_name.clone(),
        line_number: field.line_number,
        report: format_report(field, &message),
        message,
    })
}

fn first_line(err: &SchemaError) -> String {
    err.to_string().lines().next().unwrap_or_default().to_string()
}

/// A compiled schema acting as a named type for other schemas.
///
/// Fields resolve against the registry that compiled the schema. The handle
/// is weak, so a schema registered into its own registry does not keep it
/// alive; once that registry is dropped the invoking call's registry is
/// used instead.
pub struct SchemaValidator {
    name: String,
    fields: Arc<[FieldDescriptor]>,
    owner: WeakRegistry,
}

impl SchemaValidator {
    pub fn new(name: impl Into<String>, schema: &CompiledSchema) -> Self {
        Self {
            name: name.into(),
            fields: Arc::clone(&schema.fields),
            owner: schema.registry.downgrade(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self, cx: &ValidationContext) -> CompiledSchema {
        CompiledSchema {
            fields: Arc::clone(&self.fields),
            registry: self.owner.upgrade().unwrap_or_else(|| cx.registry.clone()),
            max_depth: cx.max_depth,
        }
    }
}

impl Validator for SchemaValidator {
    /// Validates a copy; the copy is returned for write-back.
    fn validate(
        &self,
        value: Option<&Value>,
        args: &Args,
        enum_list: &[Literal],
        cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection> {
        let mut copy = value.cloned();
        self.validate_in_place(copy.as_mut(), args, enum_list, cx)?;
        Ok(copy.filter(|v| !v.is_null()))
    }

    fn validate_in_place(
        &self,
        value: Option<&mut Value>,
        args: &Args,
        _enum_list: &[Literal],
        cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection> {
        let value = match value {
            Some(v) if !v.is_null() => v,
            _ if args.is_optional() => return Ok(None),
            v => {
                return Err(Rejection::Message(format!(
                    "missing value, expected @{}, got {}",
                    self.name,
                    describe(v.as_deref())
                )));
            }
        };

        if cx.depth >= cx.max_depth {
            return Err(Rejection::TooDeep { limit: cx.max_depth });
        }

        let schema = self.schema(cx);
        cx.depth += 1;
        let outcome = schema.invoke(Invocation::Nested { value, cx });
        cx.depth -= 1;

        outcome?;
        Ok(None)
    }
}
