use std::collections::BTreeMap;
use std::sync::Arc;

use super::kv::{KeyValueStore, StoreError, StoreKey, load_json, save_json};
use crate::FormState;

/// Named form snapshots, persisted as one JSON object under
/// [`StoreKey::Templates`].
pub struct TemplateStore {
    store: Arc<dyn KeyValueStore>,
    templates: BTreeMap<String, FormState>,
}

impl TemplateStore {
    /// Loads the persisted templates. A payload that no longer decodes is
    /// logged and replaced by an empty set.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        let templates = match load_json(store.as_ref(), StoreKey::Templates).await {
            Ok(found) => found.unwrap_or_default(),
            Err(StoreError::Serialization(reason)) => {
                tracing::warn!(%reason, "discarding unreadable templates");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        tracing::debug!(count = templates.len(), "templates loaded");
        Ok(Self { store, templates })
    }

    /// Template names in alphabetical order.
    pub fn list(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Result<&FormState, StoreError> {
        self.templates
            .get(name.trim())
            .ok_or_else(|| StoreError::NotFound(name.trim().to_string()))
    }

    /// Saves `form` under the trimmed `name`, overwriting any template with
    /// the same name. Returns the name actually used.
    pub async fn save(
        &mut self,
        name: &str,
        form: FormState,
    ) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let mut next = self.templates.clone();
        next.insert(name.to_string(), form);
        self.commit(next).await?;
        tracing::info!(template = %name, "template saved");
        Ok(name.to_string())
    }

    pub async fn delete(
        &mut self,
        name: &str,
    ) -> Result<(), StoreError> {
        let name = name.trim();
        if !self.templates.contains_key(name) {
            return Err(StoreError::NotFound(name.to_string()));
        }
        let mut next = self.templates.clone();
        next.remove(name);
        self.commit(next).await?;
        tracing::info!(template = %name, "template deleted");
        Ok(())
    }

    async fn commit(
        &mut self,
        next: BTreeMap<String, FormState>,
    ) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), StoreKey::Templates, &next).await?;
        self.templates = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::LineItem;
    use crate::store::memory::MemoryStore;

    fn sample_form() -> FormState {
        FormState {
            company_name: "Acme".to_string(),
            project_value: dec!(2500),
            items: vec![LineItem::new("Logo", 1, dec!(500))],
            ..FormState::default()
        }
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut templates = TemplateStore::load(kv.clone()).await.unwrap();

        let name = templates.save("  Site institucional ", sample_form()).await.unwrap();

        assert_eq!(name, "Site institucional");
        assert_eq!(templates.get("Site institucional").unwrap(), &sample_form());

        let reloaded = TemplateStore::load(kv).await.unwrap();
        assert_eq!(reloaded.get("Site institucional").unwrap(), &sample_form());
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let mut templates = TemplateStore::load(Arc::new(MemoryStore::new())).await.unwrap();

        assert_eq!(
            templates.save("   ", sample_form()).await,
            Err(StoreError::EmptyName)
        );
        assert!(templates.is_empty());
    }

    #[tokio::test]
    async fn saving_same_name_overwrites() {
        let mut templates = TemplateStore::load(Arc::new(MemoryStore::new())).await.unwrap();
        templates.save("Base", FormState::default()).await.unwrap();

        templates.save("Base", sample_form()).await.unwrap();

        assert_eq!(templates.len(), 1);
        assert_eq!(templates.get("Base").unwrap().company_name, "Acme");
    }

    #[tokio::test]
    async fn list_is_sorted() {
        let mut templates = TemplateStore::load(Arc::new(MemoryStore::new())).await.unwrap();
        for name in ["web", "app", "marketing"] {
            templates.save(name, FormState::default()).await.unwrap();
        }

        assert_eq!(templates.list(), vec!["app", "marketing", "web"]);
    }

    #[tokio::test]
    async fn delete_removes_and_persists() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut templates = TemplateStore::load(kv.clone()).await.unwrap();
        templates.save("web", FormState::default()).await.unwrap();

        templates.delete("web").await.unwrap();

        assert!(templates.is_empty());
        assert_eq!(kv.get(StoreKey::Templates).await, Ok(Some("{}".to_string())));
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let mut templates = TemplateStore::load(Arc::new(MemoryStore::new())).await.unwrap();

        assert_eq!(
            templates.delete("nope").await,
            Err(StoreError::NotFound("nope".to_string()))
        );
    }

    #[tokio::test]
    async fn unreadable_payload_loads_empty() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        kv.put(StoreKey::Templates, "not json").await.unwrap();

        let templates = TemplateStore::load(kv).await.unwrap();

        assert!(templates.is_empty());
    }
}
