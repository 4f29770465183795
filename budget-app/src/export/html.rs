use std::path::PathBuf;

use budget_core::BudgetDocument;
use budget_core::composer::content::{PRODUCT_NAME, VERSION};
use budget_core::composer::escape_html;

use super::ExportError;
use crate::platform::DownloadSink;

/// The document as a self-contained page with print-friendly styles and a
/// footer that is hidden when printed.
pub fn standalone_page(
    document: &BudgetDocument,
    company: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Orçamento - {title}</title>
    <style>
        body {{
            margin: 0;
            padding: 20px;
            font-family: 'Inter', -apple-system, BlinkMacSystemFont, sans-serif;
            background: #f5f5f5;
            line-height: 1.6;
        }}
        @media print {{
            body {{ background: white; padding: 0; }}
            .no-print {{ display: none; }}
        }}
        @media (max-width: 768px) {{
            body {{ padding: 10px; }}
            .grid {{ grid-template-columns: 1fr !important; }}
        }}
        .no-print {{
            text-align: center;
            margin-top: 30px;
            padding: 20px;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            border-radius: 15px;
            box-shadow: 0 5px 15px rgba(0,0,0,0.1);
        }}
    </style>
</head>
<body>
    {body}
    <div class="no-print">
        <h3 style="margin: 0 0 10px 0;">📄 Orçamento Profissional</h3>
        <p style="margin: 0 0 15px 0;">Para imprimir este orçamento, use <strong>Ctrl+P</strong> ou <strong>Cmd+P</strong></p>
        <p style="margin: 0; opacity: 0.8; font-size: 14px;">Gerado automaticamente pelo {PRODUCT_NAME} {VERSION}</p>
    </div>
</body>
</html>
"#,
        title = escape_html(company),
        body = document.as_str(),
    )
}

pub async fn export(
    document: &BudgetDocument,
    company: &str,
    downloads: &dyn DownloadSink,
    filename: &str,
) -> Result<PathBuf, ExportError> {
    let page = standalone_page(document, company);
    Ok(downloads.save(filename, page.as_bytes()).await?)
}
