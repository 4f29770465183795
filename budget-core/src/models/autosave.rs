use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::FormState;

/// Crash-recovery snapshot of the form, overwritten on every autosave tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutosaveSnapshot {
    pub data: FormState,
    /// ISO-8601 UTC timestamp with millisecond precision, e.g.
    /// `2025-03-01T12:00:00.000Z`.
    pub timestamp: String,
}

impl AutosaveSnapshot {
    pub fn new(
        data: FormState,
        taken_at: DateTime<Utc>,
    ) -> Self {
        Self {
            data,
            timestamp: taken_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Parses the stored timestamp back, if it is well formed.
    pub fn taken_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
