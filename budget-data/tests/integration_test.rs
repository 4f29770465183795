//! Integration tests for importing line items from disk.

use std::path::PathBuf;

use budget_core::calculations::PricingSummary;
use budget_core::{RawForm, collect};
use budget_data::{LineItemLoader, LineItemLoaderError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_load_fixture_file() {
    let rows = LineItemLoader::load_from_file(&fixture("items.csv")).expect("Should load fixture");

    let descriptions: Vec<_> = rows.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(
        descriptions,
        vec![
            "Design de interface",
            "Desenvolvimento front-end",
            "Hospedagem anual",
            "Treinamento da equipe",
        ]
    );
}

#[test]
fn test_imported_items_drive_pricing() {
    let rows = LineItemLoader::load_from_file(&fixture("items.csv")).expect("Should load fixture");
    let mut raw = RawForm::new();
    LineItemLoader::apply(&mut raw, rows, true);

    let summary = PricingSummary::from_form(&collect(&raw));

    // 1800 + 3200.50 + 2 × 1200 + 1 × 450
    assert_eq!(summary.items_total, dec!(7850.50));
    assert_eq!(summary.final_value, dec!(7850.50));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = LineItemLoader::load_from_file(&fixture("does-not-exist.csv"));

    assert!(matches!(result, Err(LineItemLoaderError::Io { .. })));
}
