use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::raw::RawValue;

static NEXT_BLUEPRINT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity token of a blueprint node, stable for the node's lifetime.
///
/// Clones share the token; anonymous inner objects are named after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("{_0:x}")]
pub struct BlueprintId(u64);

impl BlueprintId {
    pub fn next() -> Self {
        BlueprintId(NEXT_BLUEPRINT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Scope {
    #[default]
    #[display("singleton")]
    Singleton,
    #[display("prototype")]
    Prototype,
    #[display("{_0}")]
    Custom(String),
}

#[derive(Debug, Clone)]
pub struct PropertyValue {
    pub name: String,
    pub value: RawValue,
}

impl PropertyValue {
    pub fn new(name: impl Into<String>, value: RawValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Declarative description of how to construct a managed object.
#[derive(Debug, Clone)]
pub struct Blueprint {
    id: BlueprintId,
    pub class_name: Option<String>,
    pub scope: Scope,
    pub depends_on: Vec<String>,
    /// Internal machinery object, excluded from post-processing.
    pub synthetic: bool,
    pub resource_description: Option<String>,
    pub constructor_args: Vec<RawValue>,
    pub properties: Vec<PropertyValue>,
}

impl Default for Blueprint {
    fn default() -> Self {
        Self {
            id: BlueprintId::next(),
            class_name: None,
            scope: Scope::default(),
            depends_on: Vec::new(),
            synthetic: false,
            resource_description: None,
            constructor_args: Vec::new(),
            properties: Vec::new(),
        }
    }
}

impl Blueprint {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> BlueprintId {
        self.id
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn prototype(self) -> Self {
        self.with_scope(Scope::Prototype)
    }

    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    pub fn with_depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }

    pub fn with_resource_description(mut self, description: impl Into<String>) -> Self {
        self.resource_description = Some(description.into());
        self
    }

    pub fn with_constructor_arg(mut self, value: RawValue) -> Self {
        self.constructor_args.push(value);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.properties.push(PropertyValue::new(name, value));
        self
    }

    pub fn property(&self, name: &str) -> Option<&RawValue> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| &property.value)
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self.scope, Scope::Singleton)
    }

    pub fn is_prototype(&self) -> bool {
        matches!(self.scope, Scope::Prototype)
    }
}
