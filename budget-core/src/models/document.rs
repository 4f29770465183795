use std::fmt;

use serde::{Deserialize, Serialize};

/// A rendered proposal: a self-contained HTML fragment.
///
/// The structured [`crate::FormState`] stays the source of truth; this type is
/// only displayed, exported or replaced wholesale by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetDocument(String);

impl BudgetDocument {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for BudgetDocument {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BudgetDocument {
    fn from(markup: String) -> Self {
        Self(markup)
    }
}
