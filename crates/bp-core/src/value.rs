use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use serde_json::json;

use crate::ty::Ty;

/// Handle to a managed object instance.
///
/// Equality and hashing follow instance identity, never the object's contents.
#[derive(Clone)]
pub struct ObjectRef {
    type_name: Arc<str>,
    instance: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<Arc<str>>, instance: T) -> Self {
        Self {
            type_name: type_name.into(),
            instance: Arc::new(instance),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.instance), Arc::as_ptr(&other.instance))
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.instance) as *const () as usize
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}
impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl Debug for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectRef({}@{:x})", self.type_name, self.address())
    }
}

impl Display for ObjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{:x}", self.type_name, self.address())
    }
}

/// Fixed-length array with a single element type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueArray {
    pub element_ty: Ty,
    pub values: Vec<Value>,
}

impl ValueArray {
    pub fn new(element_ty: Ty, values: Vec<Value>) -> Self {
        Self { element_ty, values }
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Insertion-ordered set; a duplicate insert keeps the first occurrence's slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSet {
    values: IndexSet<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: IndexSet::with_capacity(capacity),
        }
    }
    /// Returns `false` when an equal value was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        self.values.insert(value)
    }
    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get_index(index)
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Insertion-ordered map. Re-inserting an existing key replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueMap {
    entries: IndexMap<Value, Value>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self {
            entries: pairs.into_iter().collect(),
        }
    }
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        self.entries.insert(key, value)
    }
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }
    /// Looks up an entry by a string key.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries.get(&Value::string(key))
    }
    pub fn get_index(&self, index: usize) -> Option<(&Value, &Value)> {
        self.entries.get_index(index)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.keys()
    }
}

/// Concrete runtime value produced for injection.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Char(char),
    String(String),
    /// Raw string array as it appears in blueprint metadata. Shared so that an
    /// unchanged array can be handed back as the very same instance.
    StringArray(Arc<[String]>),
    Array(ValueArray),
    List(Vec<Value>),
    Set(ValueSet),
    Map(ValueMap),
    Properties(ValueMap),
    Object(ObjectRef),
}

impl Value {
    pub fn bool(b: bool) -> Value {
        Value::Bool(b)
    }
    pub fn int(i: i64) -> Value {
        Value::Int(i)
    }
    pub fn decimal(d: f64) -> Value {
        Value::Decimal(d)
    }
    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }
    pub fn string_array<I, S>(items: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::StringArray(items.into_iter().map(Into::into).collect())
    }
    pub fn list(values: impl IntoIterator<Item = Value>) -> Value {
        Value::List(values.into_iter().collect())
    }
    pub fn object<T: Any + Send + Sync>(type_name: impl Into<Arc<str>>, instance: T) -> Value {
        Value::Object(ObjectRef::new(type_name, instance))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Short name of the variant, used in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::StringArray(_) => "string-array",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Properties(_) => "properties",
            Value::Object(_) => "object",
        }
    }

    /// Converts the value into a name string, formatting non-strings.
    pub fn into_name(self) -> String {
        match self {
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => json!(b),
            Value::Int(i) => json!(i),
            Value::Decimal(d) => json!(d),
            Value::Char(c) => json!(c.to_string()),
            Value::String(s) => json!(s),
            Value::StringArray(items) => json!(items.as_ref()),
            Value::Array(array) => array.values.iter().map(Value::to_json).collect(),
            Value::List(values) => values.iter().map(Value::to_json).collect(),
            Value::Set(set) => set.iter().map(Value::to_json).collect(),
            Value::Map(map) | Value::Properties(map) => {
                let object = map
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_json()))
                    .collect::<serde_json::Map<_, _>>();
                serde_json::Value::Object(object)
            }
            Value::Object(object) => json!({ "$object": object.type_name() }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a.total_cmp(b).is_eq(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::StringArray(a), Value::StringArray(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Properties(a), Value::Properties(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Decimal(d) => d.to_bits().hash(state),
            Value::Char(c) => c.hash(state),
            Value::String(s) => s.hash(state),
            Value::StringArray(items) => items.hash(state),
            Value::Array(array) => array.hash(state),
            Value::List(values) => values.hash(state),
            // set and map equality ignores order
            Value::Set(set) => set.len().hash(state),
            Value::Map(map) | Value::Properties(map) => map.len().hash(state),
            Value::Object(object) => object.hash(state),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Char(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::StringArray(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Array(array) => write!(f, "[{}]", array.values.iter().join(", ")),
            Value::List(values) => write!(f, "[{}]", values.iter().join(", ")),
            Value::Set(set) => write!(f, "[{}]", set.iter().join(", ")),
            Value::Map(map) | Value::Properties(map) => write!(
                f,
                "{{{}}}",
                map.iter().map(|(k, v)| format!("{}={}", k, v)).join(", ")
            ),
            Value::Object(object) => write!(f, "{}", object),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
