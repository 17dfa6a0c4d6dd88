//! References to other managed objects: by name, by type, in the parent
//! container, by name only, and through container-side candidate selection.

use indexmap::IndexSet;

use bp_core::raw::{BeanReference, DependencyDescriptor, RefTarget};
use bp_core::{debug, warn, ArgName, BeanLookup, Error, Managed, Result, Value};

use crate::resolver::ValueResolver;

impl ValueResolver<'_> {
    pub(crate) fn resolve_reference(
        &self,
        arg: &ArgName<'_>,
        reference: &BeanReference,
    ) -> Result<Value> {
        let instance = if reference.to_parent {
            let Some(parent) = self.container.parent() else {
                return Err(Error::UnresolvedParentContainer {
                    origin: self.origin(),
                    reference: reference.to_string(),
                    arg: arg.to_string(),
                });
            };
            self.lookup_in_parent(parent.as_ref(), reference)
        } else {
            self.lookup_local(reference)
        };
        let instance = instance.map_err(|source| Error::BeanReferenceCreation {
            origin: self.origin(),
            reference: reference.declared_name(),
            arg: arg.to_string(),
            source: Box::new(source),
        })?;
        Ok(instance.into_value())
    }

    fn lookup_in_parent(
        &self,
        parent: &dyn BeanLookup,
        reference: &BeanReference,
    ) -> Result<Managed> {
        match &reference.target {
            RefTarget::Type(ty) => parent.get_by_type(ty),
            RefTarget::Name(name) => {
                let name = self.evaluate_name(name)?;
                parent.get_by_name(&name)
            }
        }
    }

    /// Local lookups register the referenced bean as a dependency of the owner
    /// before the instance is handed out.
    fn lookup_local(&self, reference: &BeanReference) -> Result<Managed> {
        let (name, instance) = match &reference.target {
            RefTarget::Type(ty) => {
                let named = self.container.resolve_named_by_type(ty)?;
                (named.name, named.instance)
            }
            RefTarget::Name(name) => {
                let name = self.evaluate_name(name)?;
                let instance = self.container.get_by_name(&name)?;
                (name, instance)
            }
        };
        self.register_dependency(&name, self.bean_name);
        Ok(instance)
    }

    pub(crate) fn register_dependency(&self, dependency: &str, dependent: &str) {
        debug!("registering dependency '{}' -> '{}'", dependency, dependent);
        self.container.register_dependent_bean(dependency, dependent);
    }

    /// Name-only reference: validates that the bean exists and injects its name.
    pub(crate) fn resolve_bean_name(&self, arg: &ArgName<'_>, name: &str) -> Result<Value> {
        let name = self.evaluate_name(name)?;
        if !self.container.contains_bean(&name) {
            return Err(Error::InvalidReference {
                origin: self.origin(),
                name,
                arg: arg.to_string(),
            });
        }
        Ok(Value::String(name))
    }

    pub(crate) fn resolve_dependency(&self, descriptor: &DependencyDescriptor) -> Result<Value> {
        let mut candidates = IndexSet::with_capacity(4);
        let value = self
            .container
            .resolve_dependency(descriptor, self.bean_name, &mut candidates)?;
        for candidate in &candidates {
            if self.container.contains_bean(candidate) {
                self.register_dependency(candidate, self.bean_name);
            } else {
                warn!(
                    "dependency candidate '{}' of '{}' is not a registered bean",
                    candidate, self.bean_name
                );
            }
        }
        Ok(value)
    }
}
