//! Form files: a TOML table keyed by field identifier, plus optional
//! `[[items]]` rows.
//!
//! ```toml
//! companyName = "Acme"
//! clientName = "Bob"
//! projectDescription = "Site"
//! projectValue = 500
//! discountPercent = 10
//!
//! [[items]]
//! description = "Hospedagem"
//! quantity = 12
//! value = "29.90"
//! ```

use std::path::Path;

use budget_core::{FieldId, RawForm, RawItemRow};
use thiserror::Error;
use toml::{Table, Value};

#[derive(Debug, Error)]
pub enum FormFileError {
    #[error("cannot read form file '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("invalid form file: {0}")]
    Parse(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{field}' must be text or a number")]
    BadValue { field: String },

    #[error("item {index}: {reason}")]
    BadItem { index: usize, reason: String },
}

pub fn load(path: &Path) -> Result<RawForm, FormFileError> {
    let content = std::fs::read_to_string(path).map_err(|e| FormFileError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse(&content)
}

/// Parses form-file text. Unknown keys are rejected so typos surface.
pub fn parse(content: &str) -> Result<RawForm, FormFileError> {
    let table: Table = toml::from_str(content).map_err(|e| FormFileError::Parse(e.to_string()))?;

    let mut raw = RawForm::new();
    for (key, value) in &table {
        if key == "items" {
            raw.items = parse_items(value)?;
            continue;
        }
        let field = FieldId::parse(key).ok_or_else(|| FormFileError::UnknownField(key.clone()))?;
        let text = scalar_text(value).ok_or_else(|| FormFileError::BadValue { field: key.clone() })?;
        raw.set(field, text);
    }
    Ok(raw)
}

fn parse_items(value: &Value) -> Result<Vec<RawItemRow>, FormFileError> {
    let rows = value.as_array().ok_or_else(|| FormFileError::BadItem {
        index: 0,
        reason: "items must be an array of tables".to_string(),
    })?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let bad = |reason: &str| FormFileError::BadItem {
                index: index + 1,
                reason: reason.to_string(),
            };
            let table = row.as_table().ok_or_else(|| bad("expected a table"))?;
            let cell = |name: &str| -> Result<String, FormFileError> {
                match table.get(name) {
                    None => Ok(String::new()),
                    Some(v) => scalar_text(v).ok_or_else(|| bad(&format!("'{name}' must be text or a number"))),
                }
            };
            Ok(RawItemRow::new(cell("description")?, cell("quantity")?, cell("value")?))
        })
        .collect()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

/// Serializes the non-empty fields and all item rows back to form-file text.
pub fn render(raw: &RawForm) -> String {
    let mut table = Table::new();
    for field in FieldId::all() {
        let value = raw.get(*field);
        if !value.is_empty() {
            table.insert(field.as_str().to_string(), Value::String(value.to_string()));
        }
    }
    if !raw.items.is_empty() {
        let items = raw
            .items
            .iter()
            .map(|row| {
                let mut t = Table::new();
                t.insert("description".to_string(), Value::String(row.description.clone()));
                t.insert("quantity".to_string(), Value::String(row.quantity.clone()));
                t.insert("value".to_string(), Value::String(row.value.clone()));
                Value::Table(t)
            })
            .collect();
        table.insert("items".to_string(), Value::Array(items));
    }
    table.to_string()
}
