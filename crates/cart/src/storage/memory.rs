//! In-memory key-value store.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use super::{KeyValueStore, StorageError, StoreFuture};

/// In-memory store keyed by string.
///
/// Clones share the same map, so a test can hand one clone to a provider and
/// inspect what was written through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let map = HashMap::from([(key.into(), value.into())]);
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<Option<String>, StorageError>> {
        Box::pin(async move { Ok(self.inner.lock().await.get(key).cloned()) })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
    ) -> StoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.inner
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.inner.lock().await.remove(key);
            Ok(())
        })
    }
}
