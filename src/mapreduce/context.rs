//! In-memory shuffle store.
//!
//! Groups intermediate values by key as map workers emit them. Backed by a sharded
//! `DashMap` so that concurrent writers only contend when they hit the same shard.

use super::types::MapContext;

use dashmap::DashMap;
use std::collections::HashMap;
use std::hash::Hash;

pub struct InMemoryMapContext<K, V> {
    storage: DashMap<K, Vec<V>>,
}

impl<K, V> InMemoryMapContext<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Consumes the context and hands out the grouped data without cloning.
    pub fn into_grouped(self) -> HashMap<K, Vec<V>> {
        self.storage.into_iter().collect()
    }
}

impl<K, V> Default for InMemoryMapContext<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MapContext<K, V> for InMemoryMapContext<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn write(&self, key: K, value: V) {
        self.storage.entry(key).or_default().push(value);
    }

    fn grouped_data(&self) -> HashMap<K, Vec<V>> {
        self.storage
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn key_count(&self) -> usize {
        self.storage.len()
    }
}
