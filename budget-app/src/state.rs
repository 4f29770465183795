//! Application state owned by the controller.
//!
//! The raw form is the source of truth; the current document is derived from
//! a collected snapshot of it and only replaced wholesale (by generating,
//! loading from history or saving an edit).

use budget_core::{BudgetDocument, DocumentEditor, DocumentStats, FormState, RawForm, collect};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Field text as entered.
    pub raw: RawForm,

    current: Option<BudgetDocument>,
    stats: Option<DocumentStats>,

    pub editor: DocumentEditor,
}

impl AppState {
    pub fn new(raw: RawForm) -> Self {
        Self {
            raw,
            ..Default::default()
        }
    }

    pub fn form(&self) -> FormState {
        collect(&self.raw)
    }

    pub fn current_document(&self) -> Option<&BudgetDocument> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> Option<&DocumentStats> {
        self.stats.as_ref()
    }

    pub fn has_document(&self) -> bool {
        self.current.is_some()
    }

    /// Makes `document` current and recomputes its statistics.
    pub fn set_document(
        &mut self,
        document: BudgetDocument,
    ) -> &BudgetDocument {
        self.stats = Some(budget_core::stats(&document));
        self.current.insert(document)
    }
}

#[cfg(test)]
mod tests {
    use budget_core::FieldId;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_state_has_no_document() {
        let state = AppState::new(RawForm::new().with(FieldId::CompanyName, "Acme"));

        assert!(!state.has_document());
        assert!(state.stats().is_none());
        assert_eq!(state.form().company_name, "Acme");
    }

    #[test]
    fn set_document_computes_stats() {
        let mut state = AppState::default();

        state.set_document(BudgetDocument::new("<p>um dois ✅</p>"));

        assert_eq!(state.current_document().map(BudgetDocument::as_str), Some("<p>um dois ✅</p>"));
        assert_eq!(state.stats().map(|s| s.checklist_item_count), Some(1));
    }
}
