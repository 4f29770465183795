use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Template name must not be empty")]
    EmptyName,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// The three persisted slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    History,
    Templates,
    Autosave,
}

impl StoreKey {
    pub fn all() -> &'static [StoreKey] {
        &[StoreKey::History, StoreKey::Templates, StoreKey::Autosave]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::History => "budgetHistory",
            Self::Templates => "savedTemplates",
            Self::Autosave => "autoSavedData",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-value string storage keyed by [`StoreKey`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(
        &self,
        key: StoreKey,
    ) -> Result<Option<String>, StoreError>;

    async fn put(
        &self,
        key: StoreKey,
        value: &str,
    ) -> Result<(), StoreError>;

    async fn remove(
        &self,
        key: StoreKey,
    ) -> Result<(), StoreError>;
}

/// Reads and decodes the JSON value stored under `key`.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StoreKey,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `key`.
pub async fn save_json<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: StoreKey,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw).await
}
