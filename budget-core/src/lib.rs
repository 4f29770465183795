pub mod calculations;
pub mod catalog;
pub mod collector;
pub mod composer;
pub mod editor;
pub mod models;
pub mod stats;
pub mod store;

pub use collector::{FieldId, RawForm, RawItemRow, collect};
pub use composer::{ComposeContext, compose};
pub use editor::{DocumentEditor, EditorError, FormatCommand, Selection};
pub use models::*;
pub use stats::{DocumentStats, stats};
pub use store::{KeyValueStore, StoreError, StoreKey};
