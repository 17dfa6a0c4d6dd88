use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bp_core::collections::{ConcurrentMap, EdgeRegistry};
use bp_core::raw::DependencyDescriptor;
use bp_core::{
    bail, BeanContainer, BeanLookup, Blueprint, Error, Managed, NamedBean, Result, Ty, Value,
};
use bp_resolve::ValueResolver;
use indexmap::IndexSet;

use super::scalar::{PlaceholderEvaluator, ScalarCoercer};
use super::{TestBean, FACTORY_CLASS, FAILING_CLASS, NULL_CLASS};

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory container: registries in concurrent maps, objects built by
/// resolving their blueprint's arguments and properties.
#[derive(Default)]
pub struct TestContainer {
    definitions: ConcurrentMap<String, Arc<Blueprint>>,
    singletons: ConcurrentMap<String, Managed>,
    aliases: ConcurrentMap<String, String>,
    types: ConcurrentMap<String, Ty>,
    dependents: EdgeRegistry,
    contained: EdgeRegistry,
    created: Mutex<Vec<String>>,
    unwrapped: Mutex<Vec<(String, bool)>>,
    stale_candidates: Mutex<Vec<String>>,
    parent: Option<Arc<TestContainer>>,
    evaluator: PlaceholderEvaluator,
    coercer: ScalarCoercer,
}

impl TestContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: Arc<TestContainer>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn register_blueprint(&self, name: &str, blueprint: Blueprint) {
        if let Some(class_name) = &blueprint.class_name {
            self.register_type(class_name);
        }
        self.definitions.insert(name.to_string(), Arc::new(blueprint));
    }

    pub fn register_singleton(&self, name: &str, value: Value) {
        if let Value::Object(object) = &value {
            self.register_type(object.type_name());
        }
        self.singletons.insert(name.to_string(), Managed::Value(value));
    }

    pub fn register_null(&self, name: &str) {
        self.singletons.insert(name.to_string(), Managed::Null);
    }

    pub fn register_alias(&self, alias: &str, name: &str) {
        self.aliases.insert(alias.to_string(), name.to_string());
    }

    pub fn register_type(&self, name: &str) {
        self.types.insert(name.to_string(), Ty::named(name));
    }

    /// Makes dependency resolution report `name` as a candidate without it
    /// being registered, like a definition removed mid-resolution.
    pub fn report_stale_candidate(&self, name: &str) {
        locked(&self.stale_candidates).push(name.to_string());
    }

    pub fn define_placeholder(&self, key: &str, value: Value) {
        self.evaluator.define(key, value);
    }

    pub fn evaluator(&self) -> &PlaceholderEvaluator {
        &self.evaluator
    }

    pub fn resolver<'a>(
        &'a self,
        bean_name: &'a str,
        blueprint: &'a Blueprint,
    ) -> ValueResolver<'a> {
        ValueResolver::new(self, &self.evaluator, &self.coercer, bean_name, blueprint)
    }

    pub fn created(&self) -> Vec<String> {
        locked(&self.created).clone()
    }

    pub fn creation_count(&self, name: &str) -> usize {
        locked(&self.created).iter().filter(|n| *n == name).count()
    }

    pub fn unwrapped(&self) -> Vec<(String, bool)> {
        locked(&self.unwrapped).clone()
    }

    pub fn has_dependency(&self, dependency: &str, dependent: &str) -> bool {
        self.dependents.contains(dependency, dependent)
    }

    pub fn dependents_of(&self, dependency: &str) -> Vec<String> {
        self.dependents.targets(dependency)
    }

    pub fn contained_in(&self, owner: &str) -> Vec<String> {
        self.contained.targets(owner)
    }

    fn canonical(&self, name: &str) -> String {
        self.aliases
            .get_cloned(&name.to_string())
            .unwrap_or_else(|| name.to_string())
    }

    fn candidate_names(&self, ty: &Ty) -> Vec<String> {
        let Ty::Named(class) = ty else {
            return Vec::new();
        };
        let mut names = BTreeSet::new();
        self.definitions.for_each(|name, blueprint| {
            if blueprint.class_name.as_deref() == Some(class.as_str()) {
                names.insert(name.clone());
            }
        });
        self.singletons.for_each(|name, instance| {
            if let Managed::Value(Value::Object(object)) = instance {
                if object.type_name() == class.as_str() {
                    names.insert(name.clone());
                }
            }
        });
        names.into_iter().collect()
    }

    fn instantiate(&self, name: &str, blueprint: &Blueprint) -> Result<Value> {
        let resolver = self.resolver(name, blueprint);
        let mut args = Vec::with_capacity(blueprint.constructor_args.len());
        for (index, raw) in blueprint.constructor_args.iter().enumerate() {
            let arg_name = format!("constructor argument with index {}", index);
            args.push(resolver.resolve_named(&arg_name, raw)?);
        }
        let mut properties = Vec::with_capacity(blueprint.properties.len());
        for property in &blueprint.properties {
            let value = resolver.resolve_named(&property.name, &property.value)?;
            properties.push((property.name.clone(), value));
        }
        let class_name = blueprint
            .class_name
            .clone()
            .unwrap_or_else(|| "object".to_string());
        Ok(Value::object(
            class_name.clone(),
            TestBean {
                name: name.to_string(),
                class_name,
                args,
                properties,
            },
        ))
    }
}

impl BeanLookup for TestContainer {
    fn contains_bean(&self, name: &str) -> bool {
        let name = self.canonical(name);
        self.definitions.contains_key(&name)
            || self.singletons.contains_key(&name)
            || self
                .parent
                .as_ref()
                .map(|parent| parent.contains_bean(&name))
                .unwrap_or(false)
    }

    fn get_by_name(&self, name: &str) -> Result<Managed> {
        let name = self.canonical(name);
        if let Some(instance) = self.singletons.get_cloned(&name) {
            return Ok(instance);
        }
        let Some(blueprint) = self.definitions.get_cloned(&name) else {
            return match &self.parent {
                Some(parent) => parent.get_by_name(&name),
                None => Err(Error::NoSuchBean(name)),
            };
        };
        let instance = match self.create_object(&name, &blueprint)? {
            Managed::Factory(factory) => self.unwrap_factory_product(&factory, &name, true)?,
            instance => instance,
        };
        if blueprint.is_singleton() {
            self.singletons.insert(name, instance.clone());
        }
        Ok(instance)
    }

    fn get_by_type(&self, ty: &Ty) -> Result<Managed> {
        match (self.resolve_named_by_type(ty), &self.parent) {
            (Err(Error::NoSuchBeanOfType(_)), Some(parent)) => parent.get_by_type(ty),
            (result, _) => result.map(|named| named.instance),
        }
    }
}

impl BeanContainer for TestContainer {
    fn parent(&self) -> Option<Arc<dyn BeanLookup>> {
        self.parent
            .clone()
            .map(|parent| parent as Arc<dyn BeanLookup>)
    }

    fn resolve_named_by_type(&self, ty: &Ty) -> Result<NamedBean> {
        let mut candidates = self.candidate_names(ty);
        match candidates.len() {
            0 => Err(Error::NoSuchBeanOfType(ty.clone())),
            1 => {
                let name = candidates.remove(0);
                let instance = self.get_by_name(&name)?;
                Ok(NamedBean { name, instance })
            }
            _ => Err(Error::NoUniqueBean {
                ty: ty.clone(),
                candidates,
            }),
        }
    }

    fn resolve_dependency(
        &self,
        descriptor: &DependencyDescriptor,
        requesting_bean: &str,
        candidates: &mut IndexSet<String>,
    ) -> Result<Value> {
        let matching: Vec<String> = self
            .candidate_names(&descriptor.ty)
            .into_iter()
            .filter(|name| name != requesting_bean)
            .collect();
        let name = match matching.as_slice() {
            [] if descriptor.required => {
                return Err(Error::NoSuchBeanOfType(descriptor.ty.clone()))
            }
            [] => return Ok(Value::Null),
            [single] => single.clone(),
            many => match many.iter().find(|name| **name == descriptor.name) {
                Some(by_name) => by_name.clone(),
                None => {
                    return Err(Error::NoUniqueBean {
                        ty: descriptor.ty.clone(),
                        candidates: matching,
                    })
                }
            },
        };
        let value = self.get_by_name(&name)?.into_value();
        candidates.insert(name);
        candidates.extend(locked(&self.stale_candidates).iter().cloned());
        Ok(value)
    }

    fn register_dependent_bean(&self, dependency: &str, dependent: &str) {
        let dependency = self.canonical(dependency);
        self.dependents.register(&dependency, dependent);
    }

    fn register_contained_bean(&self, inner: &str, owner: &str) {
        self.contained.register(owner, inner);
        self.register_dependent_bean(inner, owner);
    }

    fn is_bean_name_in_use(&self, name: &str) -> bool {
        let key = name.to_string();
        self.aliases.contains_key(&key)
            || self.definitions.contains_key(&key)
            || self.singletons.contains_key(&key)
            || self.dependents.has_source(name)
    }

    fn merge_blueprint(
        &self,
        name: &str,
        nested: &Blueprint,
        owner: &Blueprint,
    ) -> Result<Arc<Blueprint>> {
        if nested.class_name.is_none() {
            bail!("inner blueprint '{}' declares no class", name);
        }
        let mut merged = nested.clone();
        if !owner.is_singleton() && merged.is_singleton() {
            merged.scope = owner.scope.clone();
        }
        Ok(Arc::new(merged))
    }

    fn create_object(&self, name: &str, blueprint: &Arc<Blueprint>) -> Result<Managed> {
        locked(&self.created).push(name.to_string());
        let class_name = blueprint.class_name.as_deref().unwrap_or_default();
        if class_name == FAILING_CLASS {
            return Err(Error::BeanCreation {
                name: name.to_string(),
                message: "constructor threw".to_string(),
            });
        }
        let value = self.instantiate(name, blueprint)?;
        Ok(match class_name {
            NULL_CLASS => Managed::Null,
            FACTORY_CLASS => Managed::Factory(value),
            _ => Managed::Value(value),
        })
    }

    fn unwrap_factory_product(
        &self,
        factory: &Value,
        name: &str,
        post_process: bool,
    ) -> Result<Managed> {
        locked(&self.unwrapped).push((name.to_string(), post_process));
        let product = factory
            .as_object()
            .and_then(|object| object.downcast_ref::<TestBean>())
            .and_then(|bean| bean.property("product"))
            .cloned()
            .ok_or_else(|| Error::BeanCreation {
                name: name.to_string(),
                message: "factory has no product".to_string(),
            })?;
        Ok(match product {
            Value::Null => Managed::Null,
            product => Managed::Value(product),
        })
    }

    fn load_type(&self, type_name: &str) -> Result<Ty> {
        Ty::primitive(type_name)
            .or_else(|| self.types.get_cloned(&type_name.to_string()))
            .ok_or_else(|| Error::TypeLoad(type_name.to_string()))
    }
}
