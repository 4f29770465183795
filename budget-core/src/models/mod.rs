mod autosave;
mod codes;
mod document;
mod form_state;
mod history_entry;

pub use autosave::AutosaveSnapshot;
pub use codes::{DeliveryType, PaymentMethod, ServiceType, Tone};
pub use document::BudgetDocument;
pub use form_state::{FormState, LineItem, defaults};
pub use history_entry::HistoryEntry;
