//! Key-value persistence
//!
//! The game only stores a handful of small strings (best score, the top-10
//! table, player settings), so storage is a string map. LocalStorage backs it
//! in the browser; [`MemoryStorage`] everywhere else.

use std::collections::HashMap;

use crate::error::StorageError;

/// Best score, as an integer string
pub const HIGH_SCORE_KEY: &str = "orbitShiftHighScore";
/// Top-10 table, as a JSON array of `{name, score}`
pub const HIGH_SCORES_KEY: &str = "orbitShiftHighScores";
/// Player settings, as JSON
pub const SETTINGS_KEY: &str = "orbitShiftSettings";

/// String key-value store
pub trait Storage {
    /// `Ok(None)` when the key was never written
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: Storage + ?Sized> Storage for &mut T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

/// Process-local store
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, handy for simulating an earlier visit
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let mut store = MemoryStorage::new();
        assert_eq!(store.get_item(HIGH_SCORE_KEY).unwrap(), None);
        store.set_item(HIGH_SCORE_KEY, "42").unwrap();
        assert_eq!(store.get_item(HIGH_SCORE_KEY).unwrap().as_deref(), Some("42"));
    }
}
