use std::sync::Arc;

use super::kv::{KeyValueStore, StoreError, StoreKey, load_json, save_json};
use crate::HistoryEntry;

/// Maximum number of entries kept.
pub const HISTORY_LIMIT: usize = 20;

/// Previously generated proposals, newest first, persisted as one JSON array
/// under [`StoreKey::History`].
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Loads the persisted history. A payload that no longer decodes is
    /// logged and replaced by an empty list.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        let mut entries: Vec<HistoryEntry> =
            match load_json(store.as_ref(), StoreKey::History).await {
                Ok(found) => found.unwrap_or_default(),
                Err(StoreError::Serialization(reason)) => {
                    tracing::warn!(%reason, "discarding unreadable history");
                    Vec::new()
                }
                Err(err) => return Err(err),
            };
        entries.truncate(HISTORY_LIMIT);
        tracing::debug!(count = entries.len(), "history loaded");
        Ok(Self { store, entries })
    }

    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(
        &self,
        id: i64,
    ) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Prepends `entry`, dropping the oldest entries beyond [`HISTORY_LIMIT`].
    ///
    /// An id already in the list is replaced by one past the largest id, so
    /// entries created within the same millisecond stay distinct. Returns
    /// the id the entry was stored under.
    pub async fn append(
        &mut self,
        mut entry: HistoryEntry,
    ) -> Result<i64, StoreError> {
        if self.get(entry.id).is_some() {
            let largest = self.entries.iter().map(|e| e.id).max().unwrap_or(entry.id);
            entry.id = largest.saturating_add(1);
        }
        let id = entry.id;
        let mut next = Vec::with_capacity(HISTORY_LIMIT);
        next.push(entry);
        next.extend(self.entries.iter().take(HISTORY_LIMIT - 1).cloned());
        self.commit(next).await?;
        Ok(id)
    }

    pub async fn delete(
        &mut self,
        id: i64,
    ) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let next = self
            .entries
            .iter()
            .filter(|entry| entry.id != id)
            .cloned()
            .collect();
        self.commit(next).await
    }

    pub async fn clear(&mut self) -> Result<(), StoreError> {
        self.commit(Vec::new()).await
    }

    async fn commit(
        &mut self,
        next: Vec<HistoryEntry>,
    ) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), StoreKey::History, &next).await?;
        self.entries = next;
        Ok(())
    }
}
