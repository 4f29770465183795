use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::factory::{StoreConfig, StoreFactory};
use super::kv::{KeyValueStore, StoreError, StoreKey};

/// In-process store; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored value.
    pub async fn snapshot(&self) -> BTreeMap<StoreKey, String> {
        self.values.read().await.clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(
        &self,
        key: StoreKey,
    ) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn put(
        &self,
        key: StoreKey,
        value: &str,
    ) -> Result<(), StoreError> {
        self.values.write().await.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(
        &self,
        key: StoreKey,
    ) -> Result<(), StoreError> {
        self.values.write().await.remove(&key);
        Ok(())
    }
}

/// Factory for the `memory` backend. The connection string is ignored.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Arc<dyn KeyValueStore>, StoreError> {
        Ok(Arc::new(MemoryStore::new()))
    }
}
