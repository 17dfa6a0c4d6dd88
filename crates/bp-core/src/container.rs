//! Collaborator interfaces between the value resolver and the container that
//! owns object identity and creation.
//!
//! The container calls the resolver for every property it injects and the
//! resolver calls back into the container for references and inner objects.
//! Both sides only see these traits.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::blueprint::Blueprint;
use crate::raw::DependencyDescriptor;
use crate::ty::Ty;
use crate::value::Value;
use crate::Result;

/// What the container hands back for a managed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Managed {
    Value(Value),
    /// Factory-style indirection; the usable object is obtained through
    /// [`BeanContainer::unwrap_factory_product`].
    Factory(Value),
    /// The explicit null object. Distinct from absence, which is an error.
    Null,
}

impl Managed {
    /// The value to inject; the null object becomes [`Value::Null`].
    pub fn into_value(self) -> Value {
        match self {
            Managed::Value(value) | Managed::Factory(value) => value,
            Managed::Null => Value::Null,
        }
    }
}

impl From<Value> for Managed {
    fn from(value: Value) -> Self {
        Managed::Value(value)
    }
}

/// A managed object together with the name it is registered under.
#[derive(Debug, Clone)]
pub struct NamedBean {
    pub name: String,
    pub instance: Managed,
}

/// Lookups a parent container has to answer.
pub trait BeanLookup: Send + Sync {
    /// Whether a definition or an externally registered instance exists under `name`.
    fn contains_bean(&self, name: &str) -> bool;

    fn get_by_name(&self, name: &str) -> Result<Managed>;

    /// Fails when no bean or more than one bean matches.
    fn get_by_type(&self, ty: &Ty) -> Result<Managed>;
}

pub trait BeanContainer: BeanLookup {
    fn parent(&self) -> Option<Arc<dyn BeanLookup>>;

    /// The single bean satisfying `ty`, with its name.
    fn resolve_named_by_type(&self, ty: &Ty) -> Result<NamedBean>;

    /// Runs candidate selection for an injection point, adding every candidate
    /// name it used to `candidates`.
    fn resolve_dependency(
        &self,
        descriptor: &DependencyDescriptor,
        requesting_bean: &str,
        candidates: &mut IndexSet<String>,
    ) -> Result<Value>;

    /// Records that `dependent` must be created after and destroyed before `dependency`.
    fn register_dependent_bean(&self, dependency: &str, dependent: &str);

    /// Records that `inner` is owned by `owner`, for cleanup ordering.
    fn register_contained_bean(&self, inner: &str, owner: &str);

    /// Whether `name` is taken as an alias, a definition, or a dependency edge source.
    fn is_bean_name_in_use(&self, name: &str) -> bool;

    fn merge_blueprint(
        &self,
        name: &str,
        nested: &Blueprint,
        owner: &Blueprint,
    ) -> Result<Arc<Blueprint>>;

    fn create_object(&self, name: &str, blueprint: &Arc<Blueprint>) -> Result<Managed>;

    fn unwrap_factory_product(
        &self,
        factory: &Value,
        name: &str,
        post_process: bool,
    ) -> Result<Managed>;

    fn load_type(&self, type_name: &str) -> Result<Ty>;
}

/// Evaluates expressions embedded in blueprint strings.
pub trait ExpressionEvaluator: Send + Sync {
    /// Returns the text unchanged as a string value when it holds no expression.
    fn evaluate(&self, text: &str, blueprint: &Blueprint) -> Result<Value>;
}

pub trait TypeCoercer: Send + Sync {
    fn coerce(&self, value: Value, target: &Ty) -> Result<Value>;
}

/// Evaluator for containers without an expression language.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughEvaluator;

impl ExpressionEvaluator for PassThroughEvaluator {
    fn evaluate(&self, text: &str, _blueprint: &Blueprint) -> Result<Value> {
        Ok(Value::string(text))
    }
}
