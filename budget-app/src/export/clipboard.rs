use budget_core::BudgetDocument;
use budget_core::stats::plain_text;

use super::ExportError;
use crate::platform::Clipboard;

/// Copies the document's plain text and returns what was copied.
pub async fn export(
    document: &BudgetDocument,
    clipboard: &dyn Clipboard,
) -> Result<String, ExportError> {
    let text = plain_text(document.as_str());
    clipboard.write_text(&text).await?;
    Ok(text)
}
