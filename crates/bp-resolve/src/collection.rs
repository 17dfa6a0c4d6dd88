use bp_core::raw::{ManagedArray, RawValue};
use bp_core::value::{ValueArray, ValueMap, ValueSet};
use bp_core::{ArgName, Error, Result, Ty, Value};

use crate::resolver::ValueResolver;

impl ValueResolver<'_> {
    /// Element type of a managed array, loaded by name once and cached on the node.
    pub(crate) fn resolve_element_type(
        &self,
        arg: &ArgName<'_>,
        array: &ManagedArray,
    ) -> Result<Ty> {
        if let Some(ty) = array.cached_element_type() {
            return Ok(ty.clone());
        }
        let declared = array
            .element_type_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let ty = match declared {
            Some(type_name) => self.container.load_type(type_name).map_err(|source| {
                Error::ArrayElementTypeLoad {
                    origin: self.origin(),
                    arg: arg.to_string(),
                    source: Box::new(source),
                }
            })?,
            None => Ty::Any,
        };
        Ok(array.cache_element_type(ty).clone())
    }

    pub(crate) fn resolve_array(
        &self,
        arg: &ArgName<'_>,
        elements: &[RawValue],
        element_ty: &Ty,
    ) -> Result<Value> {
        let mut values = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let element_arg = arg.index(index);
            let value = self.resolve(&element_arg, element)?;
            let value = if element_ty.is_any() {
                value
            } else {
                self.coercer
                    .coerce(value, element_ty)
                    .map_err(|source| self.typed_value_error(&element_arg, source))?
            };
            values.push(value);
        }
        Ok(Value::Array(ValueArray::new(element_ty.clone(), values)))
    }

    pub(crate) fn resolve_list(&self, arg: &ArgName<'_>, elements: &[RawValue]) -> Result<Value> {
        let mut resolved = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            resolved.push(self.resolve(&arg.index(index), element)?);
        }
        Ok(Value::List(resolved))
    }

    pub(crate) fn resolve_set(&self, arg: &ArgName<'_>, elements: &[RawValue]) -> Result<Value> {
        let mut resolved = ValueSet::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            resolved.insert(self.resolve(&arg.index(index), element)?);
        }
        Ok(Value::Set(resolved))
    }

    /// Keys are resolved under the map's own path; values under `arg[key]`.
    pub(crate) fn resolve_map(
        &self,
        arg: &ArgName<'_>,
        entries: &[(RawValue, RawValue)],
    ) -> Result<Value> {
        let mut resolved = ValueMap::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.resolve(arg, key)?;
            let value = self.resolve(&arg.key(&key), value)?;
            resolved.insert(key, value);
        }
        Ok(Value::Map(resolved))
    }
}
