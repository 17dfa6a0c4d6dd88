//! Concurrent registries for container implementations.
//!
//! The resolver never touches these; a container keeps its definitions,
//! singletons and dependency edges in them so that sibling resolutions on
//! different threads can register edges safely. Backed by `dashmap::DashMap`.

use dashmap::DashMap;
use indexmap::IndexSet;
use std::hash::Hash;

pub struct ConcurrentMap<K, V> {
    inner: DashMap<K, V>,
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            inner: dashmap::DashMap::new(),
        }
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.insert(key, value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    pub fn get_cloned(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    pub fn get_or_insert_with(&self, key: K, init: impl FnOnce() -> V) -> V
    where
        V: Clone,
    {
        self.inner.entry(key).or_insert_with(init).value().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for entry in self.inner.iter() {
            let (k, v) = entry.pair();
            f(k, v);
        }
    }
}

/// Directed name relation, e.g. dependency -> dependents.
///
/// Targets keep their registration order.
#[derive(Default)]
pub struct EdgeRegistry {
    edges: DashMap<String, IndexSet<String>>,
}

impl EdgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `from -> to`; returns `false` if the edge already existed.
    pub fn register(&self, from: &str, to: &str) -> bool {
        self.edges
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string())
    }

    /// Whether any edge starts at `from`.
    pub fn has_source(&self, from: &str) -> bool {
        self.edges
            .get(from)
            .map(|targets| !targets.is_empty())
            .unwrap_or(false)
    }

    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.edges
            .get(from)
            .map(|targets| targets.contains(to))
            .unwrap_or(false)
    }

    pub fn targets(&self, from: &str) -> Vec<String> {
        self.edges
            .get(from)
            .map(|targets| targets.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of distinct edges.
    pub fn len(&self) -> usize {
        self.edges.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
