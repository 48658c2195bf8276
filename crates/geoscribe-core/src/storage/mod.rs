//! Storage abstraction for persistence.
//!
//! Backends are plain string key-value stores. Encoding of the persisted
//! state lives in [`crate::persist`], so a backend never needs to know what
//! it is holding.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for durable key-value backends.
///
/// All operations are synchronous. A missing key is reported as
/// [`StorageError::NotFound`] by [`Storage::read`].
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    fn read(&self, key: &str) -> StorageResult<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a value is stored under `key`.
    fn exists(&self, key: &str) -> StorageResult<bool>;
}

/// Create a platform-appropriate storage backend in its default location.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<FileStorage> {
    FileStorage::default_location()
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<LocalStorage> {
    Ok(LocalStorage::new())
}
