// src/infrastructure/storage.rs
use crate::application::ports::storage::KeyValueStorage;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Window storage kept in process memory. Every instance starts empty.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored pairs in key order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let guard = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        guard.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let guard = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        let mut guard = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        let mut guard = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(key);
    }

    fn clear(&self) {
        let mut guard = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clear();
    }

    fn len(&self) -> usize {
        let guard = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        guard.len()
    }
}
