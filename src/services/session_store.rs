//! [SessionStore] backed by the encrypted ntex cookie session.

use super::{SessionStore, StorageError};

impl SessionStore for ntex_session::Session {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get::<String>(key)
            .map_err(|e| StorageError(format!("cant read {key}: {e}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set(key, value)
            .map_err(|e| StorageError(format!("cant write {key}: {e}")))
    }

    fn remove_item(&self, key: &str) {
        self.remove(key);
    }
}

/// In memory store used by the controller tests
#[cfg(test)]
#[derive(Default)]
pub struct MemorySessionStore {
    items: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemorySessionStore {
    pub fn with_items(items: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (key, value) in items {
            store
                .items
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }
        store
    }

    pub fn item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

#[cfg(test)]
impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.item(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}
