use std::fs::File;
use std::io::Read;
use std::path::Path;

use budget_core::{RawForm, RawItemRow};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when importing line items.
#[derive(Debug, Error)]
pub enum LineItemLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },
}

impl From<csv::Error> for LineItemLoaderError {
    fn from(err: csv::Error) -> Self {
        LineItemLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a line items CSV file.
///
/// - `description`: free text shown in the item table
/// - `quantity`: units, coerced to a positive integer when collected
/// - `value`: unit price, coerced to a non-negative amount when collected
///
/// Quantity and value stay as text so the form's coercion rules decide what
/// an unparseable cell means. Missing cells read as empty.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LineItemRecord {
    pub description: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub value: String,
}

impl From<LineItemRecord> for RawItemRow {
    fn from(record: LineItemRecord) -> Self {
        RawItemRow::new(record.description, record.quantity, record.value)
    }
}

/// Loader for line items from CSV files with a
/// `description,quantity,value` header.
pub struct LineItemLoader;

impl LineItemLoader {
    /// Parse item rows from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or a
    /// string slice. Cells are trimmed; rows are returned in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<RawItemRow>, LineItemLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();

        for result in csv_reader.deserialize() {
            let record: LineItemRecord = result?;
            rows.push(RawItemRow::from(record));
        }

        tracing::debug!(count = rows.len(), "line items parsed");
        Ok(rows)
    }

    pub fn load_from_file(path: &Path) -> Result<Vec<RawItemRow>, LineItemLoaderError> {
        let file = File::open(path).map_err(|e| LineItemLoaderError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(file)
    }

    /// Appends `rows` to the form's item list, or replaces it when `replace`
    /// is set. Returns the number of rows added.
    pub fn apply(
        raw: &mut RawForm,
        rows: Vec<RawItemRow>,
        replace: bool,
    ) -> usize {
        if replace {
            raw.items.clear();
        }
        let added = rows.len();
        raw.items.extend(rows);
        added
    }
}

#[cfg(test)]
mod tests {
    use budget_core::collect;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_parse_single_row() {
        let csv = "description,quantity,value\nLogo,1,500";

        let rows = LineItemLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(rows, vec![RawItemRow::new("Logo", "1", "500")]);
    }

    #[test]
    fn test_parse_trims_and_keeps_text() {
        let csv = "description,quantity,value\n  Hospedagem anual , 2 , \"1.200,50\"\n";

        let rows = LineItemLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(rows, vec![RawItemRow::new("Hospedagem anual", "2", "1.200,50")]);
    }

    #[test]
    fn test_parse_missing_cells_read_empty() {
        let csv = "description,quantity,value\nConsultoria\n";

        let rows = LineItemLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(rows, vec![RawItemRow::new("Consultoria", "", "")]);
    }

    #[test]
    fn test_collected_rows_follow_coercion_rules() {
        let csv = "description,quantity,value\nA,0,10\nB,x,-5\n,3,3\n";
        let rows = LineItemLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        let mut raw = RawForm::new();
        LineItemLoader::apply(&mut raw, rows, true);
        let form = collect(&raw);

        assert_eq!(form.items.len(), 2);
        assert_eq!(form.items[0].quantity, 1);
        assert_eq!(form.items[0].unit_value, dec!(10));
        assert_eq!(form.items[1].quantity, 1);
        assert_eq!(form.items[1].unit_value, dec!(0));
    }

    #[test]
    fn test_apply_appends_or_replaces() {
        let mut raw = RawForm::new();
        raw.push_item(RawItemRow::new("Existing", "1", "1"));

        let added = LineItemLoader::apply(&mut raw, vec![RawItemRow::new("New", "1", "2")], false);
        assert_eq!(added, 1);
        assert_eq!(raw.items.len(), 2);

        LineItemLoader::apply(&mut raw, vec![RawItemRow::new("Only", "1", "3")], true);
        assert_eq!(raw.items, vec![RawItemRow::new("Only", "1", "3")]);
    }

    #[test]
    fn test_parse_missing_description_column() {
        let csv = "quantity,value\n1,500";

        let result = LineItemLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(LineItemLoaderError::CsvParse(_))));
    }
}
