pub mod autosave;
pub mod factory;
pub mod history;
pub mod kv;
pub mod memory;
pub mod templates;

pub use autosave::AutosaveStore;
pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use history::{HISTORY_LIMIT, HistoryStore};
pub use kv::{KeyValueStore, StoreError, StoreKey};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use templates::TemplateStore;
