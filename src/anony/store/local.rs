use super::KeyValueStore;
use crate::error::{BoardError, Result};
use gloo_storage::{LocalStorage, Storage};

/// The browser's `localStorage`.
///
/// Values are stored raw (not JSON-encoded) so vote flags read back literally
/// as `up` / `down`, matching what earlier builds of the board wrote.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }
}

impl KeyValueStore for LocalStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|e| BoardError::Store(format!("localStorage read failed: {:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| BoardError::Store(format!("localStorage write failed: {:?}", e)))
    }
}
