//! Plain-text renderings shared by the one-shot commands and the session.

use budget_core::calculations::common::format_brl;
use budget_core::collector::Completion;
use budget_core::stats::plain_text;
use budget_core::{BudgetDocument, DocumentStats, FieldId, FormState, HistoryEntry, RawForm};
use rust_decimal::Decimal;

pub const EMPTY_HISTORY: &str = "Nenhum orçamento salvo ainda";

/// `#id  client - company  date time  service  R$ value`
pub fn history_line(entry: &HistoryEntry) -> String {
    format!(
        "#{}  {} - {}  {} {}  {}  R$ {}",
        entry.id,
        entry.client_name,
        entry.company_name,
        entry.date,
        entry.time,
        entry.service_type.code(),
        format_brl(entry.value),
    )
}

pub fn history_list(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    entries
        .iter()
        .map(history_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats_report(stats: &DocumentStats) -> String {
    format!(
        "Palavras: {}\nCaracteres: {}\nItens: {}\nQualidade: {}%",
        stats.word_count, stats.char_count, stats.checklist_item_count, stats.score
    )
}

/// Visible text of the proposal, for terminals.
pub fn document_text(document: &BudgetDocument) -> String {
    plain_text(document.as_str())
}

/// Every field with its raw text, the item rows and the running totals.
pub fn form_summary(
    raw: &RawForm,
    completion: Completion,
    items_total: Decimal,
) -> String {
    let width = FieldId::all()
        .iter()
        .map(|f| f.as_str().len())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = FieldId::all()
        .iter()
        .map(|field| format!("{:<width$}  {}", field.as_str(), raw.get(*field)))
        .collect();

    for (index, row) in raw.items.iter().enumerate() {
        lines.push(format!(
            "item {}: {} | {} x {}",
            index + 1,
            row.description,
            row.quantity,
            row.value
        ));
    }
    lines.push(format!("Total dos itens: R$ {}", format_brl(items_total)));
    lines.push(format!(
        "Progresso: {}% ({}/{}) {}",
        completion.percent,
        completion.filled,
        completion.total,
        completion.message()
    ));
    lines.join("\n")
}

/// A saved template, one `field: value` per non-empty field.
pub fn template_summary(form: &FormState) -> String {
    let raw = RawForm::from(form);
    let mut lines: Vec<String> = FieldId::all()
        .iter()
        .filter(|field| !raw.is_blank(**field))
        .map(|field| format!("{}: {}", field.as_str(), raw.get(*field)))
        .collect();
    lines.extend(raw.items.iter().map(|row| {
        format!("item: {} | {} x {}", row.description, row.quantity, row.value)
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use budget_core::ServiceType;
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn history_line_shows_names_date_service_and_value() {
        let form = FormState {
            company_name: "Acme".to_string(),
            client_name: "Bob".to_string(),
            service_type: ServiceType::parse("web"),
            project_value: dec!(2500),
            ..FormState::default()
        };
        let at = Local
            .with_ymd_and_hms(2025, 3, 7, 14, 5, 9)
            .single()
            .expect("unambiguous time");
        let entry = HistoryEntry::new(&form, BudgetDocument::new("<p>x</p>"), at);

        assert_eq!(
            history_line(&entry),
            format!("#{}  Bob - Acme  07/03/2025 14:05:09  web  R$ 2.500,00", entry.id)
        );
    }

    #[test]
    fn empty_history_placeholder() {
        assert_eq!(history_list(&[]), EMPTY_HISTORY);
    }

    #[test]
    fn stats_report_lists_counts() {
        let stats = DocumentStats {
            word_count: 10,
            char_count: 52,
            checklist_item_count: 3,
            score: 41,
        };

        assert_eq!(
            stats_report(&stats),
            "Palavras: 10\nCaracteres: 52\nItens: 3\nQualidade: 41%"
        );
    }
}
