use bp_core::config::{self, ResolverConfig};
use bp_core::error::BeanOrigin;
use bp_core::raw::RawValue;
use bp_core::{
    trace, ArgName, BeanContainer, Blueprint, ExpressionEvaluator, Result, TypeCoercer, Value,
};

/// Turns the raw values of one bean's blueprint into injectable values.
///
/// A resolver is created by the container for each bean it builds and is
/// called once per constructor argument or property. Nested values (collection
/// elements, inner blueprints) recurse through [`ValueResolver::resolve`].
pub struct ValueResolver<'a> {
    pub(crate) container: &'a dyn BeanContainer,
    pub(crate) evaluator: &'a dyn ExpressionEvaluator,
    pub(crate) coercer: &'a dyn TypeCoercer,
    pub(crate) bean_name: &'a str,
    pub(crate) blueprint: &'a Blueprint,
    pub(crate) config: ResolverConfig,
}

impl<'a> ValueResolver<'a> {
    pub fn new(
        container: &'a dyn BeanContainer,
        evaluator: &'a dyn ExpressionEvaluator,
        coercer: &'a dyn TypeCoercer,
        bean_name: &'a str,
        blueprint: &'a Blueprint,
    ) -> Self {
        Self {
            container,
            evaluator,
            coercer,
            bean_name,
            blueprint,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolves a top-level argument or property called `name`.
    pub fn resolve_named(&self, name: &str, raw: &RawValue) -> Result<Value> {
        self.resolve(&ArgName::new(name), raw)
    }

    /// Resolves `raw` into the value to inject. `arg` only feeds diagnostics.
    pub fn resolve(&self, arg: &ArgName<'_>, raw: &RawValue) -> Result<Value> {
        trace!(bean = self.bean_name, %arg, kind = raw.kind(), "resolving value");
        let value = match raw {
            RawValue::BeanRef(reference) => self.resolve_reference(arg, reference)?,
            RawValue::BeanNameRef(name) => self.resolve_bean_name(arg, name)?,
            RawValue::Holder(holder) => {
                self.resolve_inner(arg, &holder.name, &holder.aliases, &holder.blueprint)?
            }
            RawValue::Nested(blueprint) => {
                let name = self.config.inner_bean_name(blueprint.id());
                self.resolve_inner(arg, &name, &[], blueprint)?
            }
            RawValue::Dependency(descriptor) => self.resolve_dependency(descriptor)?,
            RawValue::Array(array) => {
                let element_ty = self.resolve_element_type(arg, array)?;
                self.resolve_array(arg, &array.elements, &element_ty)?
            }
            RawValue::List(list) => self.resolve_list(arg, &list.elements)?,
            RawValue::Set(set) => self.resolve_set(arg, &set.elements)?,
            RawValue::Map(map) => self.resolve_map(arg, &map.entries)?,
            RawValue::Properties(properties) => self.resolve_properties(arg, properties)?,
            RawValue::Literal(literal) => self.resolve_literal(arg, literal)?,
            RawValue::Null => Value::Null,
            RawValue::Opaque(value) => self.evaluate_opaque(value)?,
        };
        if config::trace_values() {
            trace!(bean = self.bean_name, %arg, %value, "resolved value");
        }
        Ok(value)
    }

    pub(crate) fn origin(&self) -> BeanOrigin {
        BeanOrigin::new(self.bean_name, self.blueprint.resource_description.clone())
    }
}
