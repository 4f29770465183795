pub mod loader;

pub use loader::{LineItemLoader, LineItemLoaderError, LineItemRecord};
