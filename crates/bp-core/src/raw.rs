//! Raw values as they appear in blueprint metadata, before resolution.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::blueprint::Blueprint;
use crate::ty::Ty;
use crate::value::Value;

/// String literal with an optional declared target type.
///
/// The dynamic flag and the target-type cache are the only parts of blueprint
/// metadata that resolution writes to. Both are monotonic: the flag can only be
/// raised and the cache is filled at most once.
#[derive(Debug, Default)]
pub struct TypedLiteral {
    value: Option<String>,
    target_type_name: Option<String>,
    target_type: OnceLock<Ty>,
    dynamic: AtomicBool,
}

impl TypedLiteral {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A literal whose text is absent; it always resolves to null.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn with_type_name(value: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            target_type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Literal whose target type is already known, so no lookup by name happens.
    pub fn with_target_type(value: impl Into<String>, ty: Ty) -> Self {
        let literal = Self::new(value);
        let _ = literal.target_type.set(ty);
        literal
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn target_type_name(&self) -> Option<&str> {
        self.target_type_name.as_deref()
    }

    pub fn cached_target_type(&self) -> Option<&Ty> {
        self.target_type.get()
    }

    /// Stores the resolved target type unless another caller got there first;
    /// returns whichever value ended up in the cache.
    pub fn cache_target_type(&self, ty: Ty) -> &Ty {
        self.target_type.get_or_init(|| ty)
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic.load(Ordering::Acquire)
    }

    pub fn mark_dynamic(&self) {
        self.dynamic.store(true, Ordering::Release);
    }
}

impl Clone for TypedLiteral {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            target_type_name: self.target_type_name.clone(),
            target_type: self.target_type.clone(),
            dynamic: AtomicBool::new(self.is_dynamic()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    Name(String),
    Type(Ty),
}

/// Reference to another managed object, by name or by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanReference {
    pub target: RefTarget,
    pub to_parent: bool,
}

impl BeanReference {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            target: RefTarget::Name(name.into()),
            to_parent: false,
        }
    }

    pub fn by_type(ty: Ty) -> Self {
        Self {
            target: RefTarget::Type(ty),
            to_parent: false,
        }
    }

    /// Redirects the lookup to the parent container.
    pub fn in_parent(mut self) -> Self {
        self.to_parent = true;
        self
    }

    /// The name the reference was declared with; the type name for typed references.
    pub fn declared_name(&self) -> String {
        match &self.target {
            RefTarget::Name(name) => name.clone(),
            RefTarget::Type(ty) => ty.to_string(),
        }
    }
}

impl Display for BeanReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            RefTarget::Name(name) => write!(f, "<{}>", name),
            RefTarget::Type(ty) => write!(f, "<{}>", ty),
        }
    }
}

/// Injection point whose candidates are chosen by the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDescriptor {
    pub name: String,
    pub ty: Ty,
    pub required: bool,
}

impl DependencyDescriptor {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Nested blueprint registered under an explicit name.
#[derive(Debug, Clone)]
pub struct BlueprintHolder {
    pub name: String,
    pub aliases: Vec<String>,
    pub blueprint: Arc<Blueprint>,
}

impl BlueprintHolder {
    pub fn new(name: impl Into<String>, blueprint: Blueprint) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            blueprint: Arc::new(blueprint),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManagedArray {
    pub elements: Vec<RawValue>,
    pub element_type_name: Option<String>,
    resolved_element_type: OnceLock<Ty>,
}

impl ManagedArray {
    pub fn new(elements: Vec<RawValue>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    pub fn typed(element_type_name: impl Into<String>, elements: Vec<RawValue>) -> Self {
        Self {
            elements,
            element_type_name: Some(element_type_name.into()),
            ..Self::default()
        }
    }

    pub fn cached_element_type(&self) -> Option<&Ty> {
        self.resolved_element_type.get()
    }

    pub fn cache_element_type(&self, ty: Ty) -> &Ty {
        self.resolved_element_type.get_or_init(|| ty)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ManagedList {
    pub elements: Vec<RawValue>,
}

#[derive(Debug, Clone, Default)]
pub struct ManagedSet {
    pub elements: Vec<RawValue>,
}

#[derive(Debug, Clone, Default)]
pub struct ManagedMap {
    pub entries: Vec<(RawValue, RawValue)>,
}

/// String-keyed property table; keys and values are plain literals.
#[derive(Debug, Clone, Default)]
pub struct ManagedProperties {
    pub entries: Vec<(TypedLiteral, TypedLiteral)>,
}

impl ManagedProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .push((TypedLiteral::new(key), TypedLiteral::new(value)));
        self
    }
}

/// Possibly-symbolic value attached to a blueprint argument or property.
#[derive(Debug, Clone)]
pub enum RawValue {
    Null,
    Literal(TypedLiteral),
    Opaque(Value),
    BeanRef(BeanReference),
    BeanNameRef(String),
    Dependency(DependencyDescriptor),
    Holder(BlueprintHolder),
    Nested(Arc<Blueprint>),
    Array(ManagedArray),
    List(ManagedList),
    Set(ManagedSet),
    Map(ManagedMap),
    Properties(ManagedProperties),
}

impl RawValue {
    pub fn literal(text: impl Into<String>) -> Self {
        RawValue::Literal(TypedLiteral::new(text))
    }
    pub fn typed_literal(text: impl Into<String>, type_name: impl Into<String>) -> Self {
        RawValue::Literal(TypedLiteral::with_type_name(text, type_name))
    }
    pub fn opaque(value: impl Into<Value>) -> Self {
        RawValue::Opaque(value.into())
    }
    pub fn bean_ref(name: impl Into<String>) -> Self {
        RawValue::BeanRef(BeanReference::by_name(name))
    }
    pub fn bean_name_ref(name: impl Into<String>) -> Self {
        RawValue::BeanNameRef(name.into())
    }
    pub fn nested(blueprint: Blueprint) -> Self {
        RawValue::Nested(Arc::new(blueprint))
    }
    pub fn list(elements: impl IntoIterator<Item = RawValue>) -> Self {
        RawValue::List(ManagedList {
            elements: elements.into_iter().collect(),
        })
    }
    pub fn set(elements: impl IntoIterator<Item = RawValue>) -> Self {
        RawValue::Set(ManagedSet {
            elements: elements.into_iter().collect(),
        })
    }
    pub fn map(entries: impl IntoIterator<Item = (RawValue, RawValue)>) -> Self {
        RawValue::Map(ManagedMap {
            entries: entries.into_iter().collect(),
        })
    }
    pub fn array(elements: impl IntoIterator<Item = RawValue>) -> Self {
        RawValue::Array(ManagedArray::new(elements.into_iter().collect()))
    }
    pub fn typed_array(
        element_type_name: impl Into<String>,
        elements: impl IntoIterator<Item = RawValue>,
    ) -> Self {
        RawValue::Array(ManagedArray::typed(
            element_type_name,
            elements.into_iter().collect(),
        ))
    }

    /// Short name of the variant, used in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Literal(_) => "literal",
            RawValue::Opaque(_) => "opaque",
            RawValue::BeanRef(_) => "bean-ref",
            RawValue::BeanNameRef(_) => "bean-name-ref",
            RawValue::Dependency(_) => "dependency",
            RawValue::Holder(_) => "holder",
            RawValue::Nested(_) => "nested",
            RawValue::Array(_) => "array",
            RawValue::List(_) => "list",
            RawValue::Set(_) => "set",
            RawValue::Map(_) => "map",
            RawValue::Properties(_) => "properties",
        }
    }
}
