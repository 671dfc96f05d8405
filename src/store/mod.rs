//! Durable Key-Value Store
//!
//! Persistence port for the engine. Every persisted concern (agents,
//! challenges, attempts, experience events) is stored as one JSON array under
//! its own key and rewritten in full on every save.

pub mod file;
pub mod memory;
pub mod sled_store;

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sled_store::SledStore;

/// Key-value store interface
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Decode raw stored bytes; non-UTF-8 content counts as malformed data.
pub(crate) fn decode_value(key: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
    String::from_utf8(bytes).map_err(|e| StorageError::Malformed {
        key: key.to_string(),
        reason: format!("stored value is not valid UTF-8: {}", e),
    })
}

/// Serialize a full collection and overwrite whatever is stored under `key`.
pub fn save_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(items)?;
    store.put(key, &json)?;
    tracing::debug!(key, count = items.len(), "Saved collection");
    Ok(())
}

/// Load the collection stored under `key`.
///
/// Returns `Ok(None)` when nothing was stored and `StorageError::Malformed`
/// when the stored text is not a JSON array of `T`.
pub fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<Vec<T>>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let items: Vec<T> = serde_json::from_str(&raw).map_err(|e| StorageError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!(key, count = items.len(), "Loaded collection");
    Ok(Some(items))
}

/// Load a collection, treating malformed data as empty.
///
/// Malformed data is logged and discarded; storage failures still propagate.
pub fn load_collection_or_reset<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>, StorageError> {
    match load_collection(store, key) {
        Ok(items) => Ok(items.unwrap_or_default()),
        Err(StorageError::Malformed { key, reason }) => {
            tracing::warn!(key = %key, reason = %reason, "Discarding malformed collection");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
