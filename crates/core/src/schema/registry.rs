//! Registry mapping type names to validators.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use super::builtins;
use super::compiler::{CompiledSchema, SchemaValidator};
use super::descriptor::{Args, Literal};
use super::errors::RegistryError;
use super::validator::{FnValidator, Validator};
use crate::value::Value;

/// Names of the types every new compiler starts with.
pub const BASELINE_TYPES: &[&str] = &["Date", "Email", "Number", "Object", "String"];

/// Shared, mutable mapping from type name to validator.
///
/// Cloning a `Registry` clones the handle, not the contents: every compiled
/// schema holds a handle and resolves its field types on each call, so types
/// registered or replaced later are picked up by schemas compiled earlier.
///
/// Register types during setup and treat the registry as read-mostly
/// afterwards; a registration racing an in-flight validation may or may not
/// be observed by it.
#[derive(Clone, Default)]
pub struct Registry {
    types: Arc<RwLock<TypeMap>>,
}

type TypeMap = HashMap<String, Arc<dyn Validator>>;

/// Non-owning handle to a [`Registry`].
///
/// Schema types keep one to the registry that compiled them, so a schema
/// registered into its own registry does not keep it alive.
#[derive(Clone)]
pub struct WeakRegistry {
    types: Weak<RwLock<TypeMap>>,
}

impl WeakRegistry {
    /// The registry, if any strong handle to it is still alive.
    pub fn upgrade(&self) -> Option<Registry> {
        self.types.upgrade().map(|types| Registry { types })
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the baseline types.
    pub fn with_baseline() -> Self {
        let registry = Self::new();
        builtins::register_baseline(&registry);
        registry
    }

    /// Register (or replace) a type.
    pub fn register(&self, name: impl Into<String>, validator: impl Validator + 'static) {
        self.register_arc(name, Arc::new(validator));
    }

    pub fn register_arc(&self, name: impl Into<String>, validator: Arc<dyn Validator>) {
        let name = name.into();
        tracing::debug!(type_name = %name, "registering type");
        self.types.write().unwrap_or_else(PoisonError::into_inner).insert(name, validator);
    }

    /// Register a closure as a type.
    pub fn register_fn<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(Option<&Value>, &Args, &[Literal]) -> Result<Option<Value>, String>
            + Send
            + Sync
            + 'static,
    {
        self.register(name, FnValidator(f));
    }

    /// Register a compiled schema as a type, enabling nested and recursive schemas.
    pub fn register_schema(&self, name: impl Into<String>, schema: &CompiledSchema) {
        let name = name.into();
        let validator = SchemaValidator::new(name.clone(), schema);
        self.register(name, validator);
    }

    /// Look up a type. The validator is cloned out so no lock is held while it runs.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Validator>, RegistryError> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.read().unwrap_or_else(PoisonError::into_inner).contains_key(name)
    }

    /// All registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.types.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn downgrade(&self) -> WeakRegistry {
        WeakRegistry { types: Arc::downgrade(&self.types) }
    }

    /// Whether two handles point at the same registry.
    pub fn same_as(&self, other: &Registry) -> bool {
        Arc::ptr_eq(&self.types, &other.types)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("types", &self.type_names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validator::ValidationContext;

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("String"));
        assert_eq!(
            registry.resolve("String").err(),
            Some(RegistryError::UnknownType("String".to_string()))
        );
    }

    #[test]
    fn test_baseline_types() {
        let registry = Registry::with_baseline();
        assert_eq!(registry.type_names(), BASELINE_TYPES);
        for name in BASELINE_TYPES {
            assert!(registry.resolve(name).is_ok(), "{name} should resolve");
        }
    }

    #[test]
    fn test_register_fn() {
        let registry = Registry::new();
        registry.register_fn("Even", |value, _args, _enum| match value.and_then(Value::as_f64) {
            Some(n) if n % 2.0 == 0.0 => Ok(None),
            _ => Err("expected an even number".to_string()),
        });

        let even = registry.resolve("Even").unwrap();
        let mut cx = ValidationContext::default();
        assert!(even.validate(Some(&Value::Number(4.0)), &Args::new(), &[], &mut cx).is_ok());
        assert!(even.validate(Some(&Value::Number(3.0)), &Args::new(), &[], &mut cx).is_err());
    }

    #[test]
    fn test_register_replaces() {
        let registry = Registry::new();
        registry.register_fn("T", |_, _, _| Ok(Some(Value::from("first"))));
        registry.register_fn("T", |_, _, _| Ok(Some(Value::from("second"))));
        assert_eq!(registry.len(), 1);

        let t = registry.resolve("T").unwrap();
        let out = t.validate(None, &Args::new(), &[], &mut ValidationContext::default());
        assert_eq!(out.unwrap(), Some(Value::from("second")));
    }

    #[test]
    fn test_clones_share_contents() {
        let registry = Registry::new();
        let handle = registry.clone();
        handle.register_fn("Late", |_, _, _| Ok(None));
        assert!(registry.contains("Late"));
        assert!(registry.same_as(&handle));
        assert!(!registry.same_as(&Registry::new()));
    }

    #[test]
    fn test_weak_handle_does_not_keep_registry_alive() {
        let registry = Registry::new();
        let weak = registry.downgrade();
        assert!(weak.upgrade().is_some_and(|r| r.same_as(&registry)));

        drop(registry);
        assert!(weak.upgrade().is_none());
    }
}
