use budget_core::BudgetDocument;

use super::ExportError;
use crate::platform::PrintSpooler;

/// Delay between the page loading and the print dialog opening.
pub const PRINT_DELAY_MS: u32 = 500;

/// A4 print page that opens the print dialog on load and closes itself
/// afterwards.
pub fn print_page(document: &BudgetDocument) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Imprimir Orçamento</title>
    <style>
        body {{
            font-family: 'Inter', -apple-system, BlinkMacSystemFont, sans-serif;
            margin: 0;
            padding: 20px;
            background: white;
            line-height: 1.6;
        }}
        @media print {{
            body {{ margin: 0; padding: 15px; }}
        }}
        @page {{
            margin: 1cm;
            size: A4;
        }}
    </style>
    <script>
        window.addEventListener('load', function () {{
            window.focus();
            setTimeout(function () {{
                window.print();
                window.close();
            }}, {PRINT_DELAY_MS});
        }});
    </script>
</head>
<body>
    {}
</body>
</html>
"#,
        document.as_str()
    )
}

pub async fn export(
    document: &BudgetDocument,
    spooler: &dyn PrintSpooler,
) -> Result<(), ExportError> {
    Ok(spooler.print(&print_page(document)).await?)
}
