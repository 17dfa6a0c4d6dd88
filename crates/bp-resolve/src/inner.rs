//! Inner blueprints: anonymous objects created on the spot for a single
//! injection point.

use bp_core::{debug, ArgName, Blueprint, Error, Managed, Result, Value};

use crate::resolver::ValueResolver;

/// What is known about an inner bean so far; feeds the error annotation.
struct InnerBean {
    name: String,
    class_name: Option<String>,
}

impl ValueResolver<'_> {
    pub(crate) fn resolve_inner(
        &self,
        arg: &ArgName<'_>,
        proposed_name: &str,
        aliases: &[String],
        nested: &Blueprint,
    ) -> Result<Value> {
        let mut inner = InnerBean {
            name: proposed_name.to_string(),
            class_name: None,
        };
        self.instantiate_inner(nested, aliases, &mut inner)
            .map_err(|source| Error::InnerBeanCreation {
                origin: self.origin(),
                inner_name: inner.name,
                class_name: inner.class_name,
                arg: arg.to_string(),
                source: Box::new(source),
            })
    }

    fn instantiate_inner(
        &self,
        nested: &Blueprint,
        aliases: &[String],
        inner: &mut InnerBean,
    ) -> Result<Value> {
        let merged = self
            .container
            .merge_blueprint(&inner.name, nested, self.blueprint)?;
        inner.class_name = merged.class_name.clone();
        if merged.is_singleton() {
            inner.name = self.adapt_inner_bean_name(&inner.name);
        }
        let name = inner.name.as_str();
        debug!(
            "creating inner bean '{}' for '{}' (aliases: {:?})",
            name, self.bean_name, aliases
        );
        self.container.register_contained_bean(name, self.bean_name);

        for dependency in &merged.depends_on {
            self.register_dependency(dependency, name);
            self.container.get_by_name(dependency)?;
        }

        let instance = match self.container.create_object(name, &merged)? {
            Managed::Factory(factory) => {
                self.container
                    .unwrap_factory_product(&factory, name, !merged.synthetic)?
            }
            instance => instance,
        };
        Ok(instance.into_value())
    }

    /// Appends `#1`, `#2`, ... to `name` until the container no longer knows it.
    fn adapt_inner_bean_name(&self, name: &str) -> String {
        let mut actual = name.to_string();
        let mut counter = 0;
        while self.container.is_bean_name_in_use(&actual) {
            counter += 1;
            actual = self.config.numbered_name(name, counter);
        }
        actual
    }
}
