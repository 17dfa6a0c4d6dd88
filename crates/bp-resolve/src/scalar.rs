//! Literal, properties and plain-value resolution: expression evaluation
//! followed by optional coercion.

use std::sync::Arc;

use bp_core::raw::{ManagedProperties, TypedLiteral};
use bp_core::value::{ValueArray, ValueMap};
use bp_core::{ArgName, Error, Result, Ty, Value};

use crate::resolver::ValueResolver;

impl ValueResolver<'_> {
    pub(crate) fn evaluate_text(&self, text: &str) -> Result<Value> {
        self.evaluator.evaluate(text, self.blueprint)
    }

    /// Evaluates a bean name that may itself be an expression.
    pub(crate) fn evaluate_name(&self, name: &str) -> Result<String> {
        Ok(self.evaluate_text(name)?.into_name())
    }

    /// Evaluates the literal's text, raising its dynamic flag when the result
    /// differs from the text.
    pub(crate) fn evaluate_literal(&self, literal: &TypedLiteral) -> Result<Value> {
        let Some(text) = literal.value() else {
            return Ok(Value::Null);
        };
        let result = self.evaluate_text(text)?;
        if result.as_str() != Some(text) {
            literal.mark_dynamic();
        }
        Ok(result)
    }

    pub(crate) fn resolve_literal(
        &self,
        arg: &ArgName<'_>,
        literal: &TypedLiteral,
    ) -> Result<Value> {
        let value = self.evaluate_literal(literal)?;
        let target = self
            .resolve_target_type(literal)
            .map_err(|source| self.typed_value_error(arg, source))?;
        match target {
            Some(target) => self
                .coercer
                .coerce(value, &target)
                .map_err(|source| self.typed_value_error(arg, source)),
            None => Ok(value),
        }
    }

    fn resolve_target_type(&self, literal: &TypedLiteral) -> Result<Option<Ty>> {
        if let Some(ty) = literal.cached_target_type() {
            return Ok(Some(ty.clone()));
        }
        let Some(type_name) = literal.target_type_name() else {
            return Ok(None);
        };
        let ty = self.container.load_type(type_name)?;
        Ok(Some(literal.cache_target_type(ty).clone()))
    }

    pub(crate) fn typed_value_error(&self, arg: &ArgName<'_>, source: Error) -> Error {
        Error::TypedValueConversion {
            origin: self.origin(),
            arg: arg.to_string(),
            source: Box::new(source),
        }
    }

    /// Property tables only hold plain strings, so entries are evaluated but
    /// never resolved recursively.
    pub(crate) fn resolve_properties(
        &self,
        arg: &ArgName<'_>,
        properties: &ManagedProperties,
    ) -> Result<Value> {
        let mut copy = ValueMap::with_capacity(properties.entries.len());
        for (key, value) in &properties.entries {
            let key = self.evaluate_literal(key)?;
            let value = self.evaluate_literal(value)?;
            if key.is_null() || value.is_null() {
                return Err(Error::PropertiesConversion {
                    origin: self.origin(),
                    arg: arg.to_string(),
                });
            }
            copy.insert(key, value);
        }
        Ok(Value::Properties(copy))
    }

    pub(crate) fn evaluate_opaque(&self, value: &Value) -> Result<Value> {
        match value {
            Value::String(text) => self.evaluate_text(text),
            Value::StringArray(items) => self.evaluate_string_array(items),
            other => Ok(other.clone()),
        }
    }

    /// Hands back the same shared array when no element changed.
    fn evaluate_string_array(&self, items: &Arc<[String]>) -> Result<Value> {
        let mut changed = false;
        let mut resolved = Vec::with_capacity(items.len());
        for item in items.iter() {
            let value = self.evaluate_text(item)?;
            if value.as_str() != Some(item.as_str()) {
                changed = true;
            }
            resolved.push(value);
        }
        if !changed {
            return Ok(Value::StringArray(Arc::clone(items)));
        }
        Ok(Value::Array(ValueArray::new(Ty::Any, resolved)))
    }
}
