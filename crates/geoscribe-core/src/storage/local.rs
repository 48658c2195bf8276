//! Browser `localStorage` implementation for WebAssembly.

use super::{Storage, StorageError, StorageResult};

/// `window.localStorage`-backed storage.
///
/// The handle is looked up on every call; it is not cached because
/// `web_sys::Storage` is not `Send`.
#[derive(Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn handle() -> StorageResult<web_sys::Storage> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".to_string()))
    }
}

impl Storage for LocalStorage {
    fn read(&self, key: &str) -> StorageResult<String> {
        Self::handle()?
            .get_item(key)
            .map_err(|e| StorageError::Other(format!("Failed to read {}: {:?}", key, e)))?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        // Quota errors surface here.
        Self::handle()?
            .set_item(key, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {:?}", key, e)))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        Self::handle()?
            .remove_item(key)
            .map_err(|e| StorageError::Other(format!("Failed to delete {}: {:?}", key, e)))
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let item = Self::handle()?
            .get_item(key)
            .map_err(|e| StorageError::Other(format!("Failed to read {}: {:?}", key, e)))?;
        Ok(item.is_some())
    }
}
