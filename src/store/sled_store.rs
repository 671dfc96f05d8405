//! Embedded database store backed by sled.

use crate::error::StorageError;
use crate::store::{self, KeyValueStore};
use std::path::Path;

pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.db.get(key.as_bytes())? {
            Some(value) => store::decode_value(key, value.to_vec()).map(Some),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db.insert(key.as_bytes(), value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db.remove(key.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sled_store_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = SledStore::open(&temp.path().join("db")).unwrap();

        assert!(store.get("events").unwrap().is_none());
        store.put("events", "[1,2,3]").unwrap();
        assert_eq!(store.get("events").unwrap().as_deref(), Some("[1,2,3]"));
        store.remove("events").unwrap();
        assert!(store.get("events").unwrap().is_none());
    }
}
