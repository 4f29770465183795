use std::sync::Arc;

use super::kv::{KeyValueStore, StoreError, StoreKey, load_json, save_json};
use crate::AutosaveSnapshot;

/// The single crash-recovery slot under [`StoreKey::Autosave`].
#[derive(Clone)]
pub struct AutosaveStore {
    store: Arc<dyn KeyValueStore>,
}

impl AutosaveStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save(
        &self,
        snapshot: &AutosaveSnapshot,
    ) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), StoreKey::Autosave, snapshot).await
    }

    pub async fn load(&self) -> Result<Option<AutosaveSnapshot>, StoreError> {
        load_json(self.store.as_ref(), StoreKey::Autosave).await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(StoreKey::Autosave).await
    }
}
