//! The validator capability contract.

use super::descriptor::{Args, Literal};
use super::errors::Rejection;
use super::registry::Registry;
use crate::value::Value;

/// Default limit on nested schema invocations per call.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Per-call state threaded through nested schema invocations.
///
/// `registry` is the one the outermost schema was compiled against; nested
/// schema types fall back to it once the registry that compiled them is gone.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub registry: Registry,
    /// Number of schema types currently being validated inside each other.
    pub depth: usize,
    pub max_depth: usize,
}

impl ValidationContext {
    pub fn new(registry: Registry, max_depth: usize) -> Self {
        Self { registry, depth: 0, max_depth }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(Registry::new(), DEFAULT_MAX_DEPTH)
    }
}

/// A named type's validation logic.
///
/// `value` is `None` when the field's path did not resolve. On success the
/// returned value (if any) is written back to the field, so validators may
/// coerce: parse a numeric string, normalize an email, and so on.
pub trait Validator: Send + Sync {
    fn validate(
        &self,
        value: Option<&Value>,
        args: &Args,
        enum_list: &[Literal],
        cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection>;

    /// Validate the field's value where it lives.
    ///
    /// The default defers to [`Validator::validate`] and leaves write-back to
    /// the caller. Validators that work on whole subtrees, such as schema
    /// types, override this to coerce inside `value` directly and return
    /// `Ok(None)`.
    fn validate_in_place(
        &self,
        value: Option<&mut Value>,
        args: &Args,
        enum_list: &[Literal],
        cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection> {
        self.validate(value.as_deref(), args, enum_list, cx)
    }
}

/// Adapts a plain closure into a [`Validator`].
pub struct FnValidator<F>(pub F);

impl<F> Validator for FnValidator<F>
where
    F: Fn(Option<&Value>, &Args, &[Literal]) -> Result<Option<Value>, String> + Send + Sync,
{
    fn validate(
        &self,
        value: Option<&Value>,
        args: &Args,
        enum_list: &[Literal],
        _cx: &mut ValidationContext,
    ) -> Result<Option<Value>, Rejection> {
        (self.0)(value, args, enum_list).map_err(Rejection::Message)
    }
}
