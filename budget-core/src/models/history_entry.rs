use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::codes::ServiceType;
use super::document::BudgetDocument;
use super::form_state::FormState;

/// A previously generated proposal, kept in the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Creation time in milliseconds since the Unix epoch.
    pub id: i64,
    /// `dd/mm/yyyy`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
    pub company_name: String,
    pub client_name: String,
    /// The project-value field, not the computed total.
    pub value: Decimal,
    pub service_type: ServiceType,
    pub budget: BudgetDocument,
}

impl HistoryEntry {
    pub fn new(
        form: &FormState,
        budget: BudgetDocument,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: created_at.timestamp_millis(),
            date: created_at.format("%d/%m/%Y").to_string(),
            time: created_at.format("%H:%M:%S").to_string(),
            company_name: form.company_name.clone(),
            client_name: form.client_name.clone(),
            value: form.project_value,
            service_type: form.service_type.clone(),
            budget,
        }
    }
}
