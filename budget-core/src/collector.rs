//! Form State Collector.
//!
//! Turns the raw text of the form ([`RawForm`]) into a fully populated
//! [`FormState`]. Blank fields receive the values in
//! [`crate::models::defaults`]; numbers that fail to parse fall back to the
//! same defaults and log a warning.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;

use crate::calculations::common::{parse_amount, parse_count, round_half_up};
use crate::calculations::pricing;
use crate::models::defaults;
use crate::{DeliveryType, FormState, LineItem, PaymentMethod, ServiceType, Tone};

/// Identifier of every scalar input on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    CompanyName,
    CompanyPhone,
    CompanyEmail,
    CompanyAddress,
    CompanyCnpj,
    ClientName,
    ClientPhone,
    ClientEmail,
    ClientCompany,
    ServiceType,
    ProjectDescription,
    ProjectValue,
    ProjectDeadline,
    BudgetTone,
    BudgetLanguage,
    BudgetComplexity,
    PaymentMethod,
    DiscountPercent,
    DeliveryType,
    SupportDays,
}

/// Fields that must be non-blank before a proposal is generated.
pub const REQUIRED_FIELDS: [FieldId; 3] = [
    FieldId::CompanyName,
    FieldId::ClientName,
    FieldId::ProjectDescription,
];

/// Fields counted by the completion indicator.
pub const TRACKED_FIELDS: [FieldId; 8] = [
    FieldId::CompanyName,
    FieldId::CompanyEmail,
    FieldId::ClientName,
    FieldId::ClientEmail,
    FieldId::ServiceType,
    FieldId::ProjectDescription,
    FieldId::ProjectValue,
    FieldId::ProjectDeadline,
];

impl FieldId {
    pub fn all() -> &'static [FieldId] {
        &[
            FieldId::CompanyName,
            FieldId::CompanyPhone,
            FieldId::CompanyEmail,
            FieldId::CompanyAddress,
            FieldId::CompanyCnpj,
            FieldId::ClientName,
            FieldId::ClientPhone,
            FieldId::ClientEmail,
            FieldId::ClientCompany,
            FieldId::ServiceType,
            FieldId::ProjectDescription,
            FieldId::ProjectValue,
            FieldId::ProjectDeadline,
            FieldId::BudgetTone,
            FieldId::BudgetLanguage,
            FieldId::BudgetComplexity,
            FieldId::PaymentMethod,
            FieldId::DiscountPercent,
            FieldId::DeliveryType,
            FieldId::SupportDays,
        ]
    }

    /// The form's input identifier, e.g. `companyName`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyName => "companyName",
            Self::CompanyPhone => "companyPhone",
            Self::CompanyEmail => "companyEmail",
            Self::CompanyAddress => "companyAddress",
            Self::CompanyCnpj => "companyCNPJ",
            Self::ClientName => "clientName",
            Self::ClientPhone => "clientPhone",
            Self::ClientEmail => "clientEmail",
            Self::ClientCompany => "clientCompany",
            Self::ServiceType => "serviceType",
            Self::ProjectDescription => "projectDescription",
            Self::ProjectValue => "projectValue",
            Self::ProjectDeadline => "projectDeadline",
            Self::BudgetTone => "budgetTone",
            Self::BudgetLanguage => "budgetLanguage",
            Self::BudgetComplexity => "budgetComplexity",
            Self::PaymentMethod => "paymentMethod",
            Self::DiscountPercent => "discountPercent",
            Self::DeliveryType => "deliveryType",
            Self::SupportDays => "supportDays",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|field| field.as_str() == id.trim())
    }
}

impl fmt::Display for FieldId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One item row as typed: quantity and value are still text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItemRow {
    pub description: String,
    pub quantity: String,
    pub value: String,
}

impl RawItemRow {
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.into(),
            value: value.into(),
        }
    }

    /// A freshly added row: empty description, quantity 1, no value.
    pub fn blank() -> Self {
        Self::new("", "1", "")
    }
}

/// Untyped field text as entered, before defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    fields: BTreeMap<FieldId, String>,
    pub items: Vec<RawItemRow>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text of a field; empty when never set.
    pub fn get(
        &self,
        field: FieldId,
    ) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(
        &mut self,
        field: FieldId,
        value: impl Into<String>,
    ) {
        self.fields.insert(field, value.into());
    }

    /// Builder form of [`RawForm::set`].
    pub fn with(
        mut self,
        field: FieldId,
        value: impl Into<String>,
    ) -> Self {
        self.set(field, value);
        self
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.items.clear();
    }

    pub fn is_blank(
        &self,
        field: FieldId,
    ) -> bool {
        self.get(field).trim().is_empty()
    }

    pub fn push_item(
        &mut self,
        row: RawItemRow,
    ) {
        self.items.push(row);
    }

    pub fn remove_item(
        &mut self,
        index: usize,
    ) -> Option<RawItemRow> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}

impl From<&FormState> for RawForm {
    fn from(form: &FormState) -> Self {
        let mut raw = RawForm::new();
        raw.set(FieldId::CompanyName, &form.company_name);
        raw.set(FieldId::CompanyPhone, &form.company_phone);
        raw.set(FieldId::CompanyEmail, &form.company_email);
        raw.set(FieldId::CompanyAddress, &form.company_address);
        raw.set(FieldId::CompanyCnpj, &form.company_cnpj);
        raw.set(FieldId::ClientName, &form.client_name);
        raw.set(FieldId::ClientPhone, &form.client_phone);
        raw.set(FieldId::ClientEmail, &form.client_email);
        raw.set(FieldId::ClientCompany, &form.client_company);
        raw.set(FieldId::ServiceType, form.service_type.code());
        raw.set(FieldId::ProjectDescription, &form.project_description);
        raw.set(FieldId::ProjectValue, form.project_value.to_string());
        raw.set(FieldId::ProjectDeadline, form.project_deadline.to_string());
        raw.set(FieldId::BudgetTone, form.budget_tone.code());
        raw.set(FieldId::BudgetLanguage, &form.budget_language);
        raw.set(FieldId::BudgetComplexity, &form.budget_complexity);
        raw.set(FieldId::PaymentMethod, form.payment_method.code());
        raw.set(FieldId::DiscountPercent, form.discount_percent.to_string());
        raw.set(FieldId::DeliveryType, form.delivery_type.code());
        raw.set(FieldId::SupportDays, form.support_days.to_string());
        raw.items = form
            .items
            .iter()
            .map(|item| {
                RawItemRow::new(
                    item.description.clone(),
                    item.quantity.to_string(),
                    item.unit_value.to_string(),
                )
            })
            .collect();
        raw
    }
}

/// Assembles a fully populated [`FormState`] from the raw form.
pub fn collect(raw: &RawForm) -> FormState {
    let text = |field: FieldId, default: &str| -> String {
        let value = raw.get(field);
        if value.trim().is_empty() {
            default.to_string()
        } else {
            value.to_string()
        }
    };

    let form = FormState {
        company_name: text(FieldId::CompanyName, defaults::COMPANY_NAME),
        company_phone: text(FieldId::CompanyPhone, defaults::COMPANY_PHONE),
        company_email: text(FieldId::CompanyEmail, defaults::COMPANY_EMAIL),
        company_address: text(FieldId::CompanyAddress, ""),
        company_cnpj: text(FieldId::CompanyCnpj, ""),
        client_name: text(FieldId::ClientName, defaults::CLIENT_NAME),
        client_phone: text(FieldId::ClientPhone, defaults::CLIENT_PHONE),
        client_email: text(FieldId::ClientEmail, defaults::CLIENT_EMAIL),
        client_company: text(FieldId::ClientCompany, ""),
        service_type: ServiceType::parse(&text(FieldId::ServiceType, defaults::SERVICE_TYPE)),
        project_description: text(FieldId::ProjectDescription, defaults::PROJECT_DESCRIPTION),
        project_value: amount_or(raw, FieldId::ProjectValue, defaults::PROJECT_VALUE),
        project_deadline: count_or(raw, FieldId::ProjectDeadline, defaults::PROJECT_DEADLINE),
        budget_tone: Tone::parse(&text(FieldId::BudgetTone, defaults::BUDGET_TONE)),
        budget_language: text(FieldId::BudgetLanguage, defaults::BUDGET_LANGUAGE),
        budget_complexity: text(FieldId::BudgetComplexity, defaults::BUDGET_COMPLEXITY),
        payment_method: PaymentMethod::parse(&text(
            FieldId::PaymentMethod,
            defaults::PAYMENT_METHOD,
        )),
        discount_percent: amount_or(raw, FieldId::DiscountPercent, defaults::DISCOUNT_PERCENT),
        delivery_type: DeliveryType::parse(&text(FieldId::DeliveryType, defaults::DELIVERY_TYPE)),
        support_days: count_or(raw, FieldId::SupportDays, defaults::SUPPORT_DAYS),
        items: collect_items(&raw.items),
    };

    tracing::debug!(
        company = %form.company_name,
        client = %form.client_name,
        items = form.items.len(),
        "form collected"
    );
    form
}

/// Required fields that are blank, in form order.
pub fn missing_required(raw: &RawForm) -> Vec<FieldId> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| raw.is_blank(*field))
        .collect()
}

/// Message shown when generation is blocked by blank required fields.
pub fn missing_fields_message(missing: &[FieldId]) -> String {
    let names: Vec<&str> = missing.iter().map(FieldId::as_str).collect();
    format!(
        "Por favor, preencha os campos obrigatórios: {}",
        names.join(", ")
    )
}

/// How much of the form has been filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub filled: usize,
    pub total: usize,
    /// 0..=100, rounded.
    pub percent: u8,
}

impl Completion {
    pub fn message(&self) -> &'static str {
        if self.filled == 0 {
            "Preencha os dados para começar"
        } else if self.filled * 2 < self.total {
            "Continue preenchendo os dados..."
        } else if self.filled < self.total {
            "Quase pronto! Preencha os campos restantes"
        } else {
            "Perfeito! Pronto para gerar o orçamento"
        }
    }
}

/// Completion over [`TRACKED_FIELDS`].
pub fn completion(raw: &RawForm) -> Completion {
    let total = TRACKED_FIELDS.len();
    let filled = TRACKED_FIELDS
        .iter()
        .filter(|field| !raw.is_blank(**field))
        .count();
    let percent = ((filled * 100 + total / 2) / total) as u8;
    Completion {
        filled,
        total,
        percent,
    }
}

/// Running total of the item rows as they would be collected.
pub fn items_total(raw: &RawForm) -> Decimal {
    pricing::items_total(&collect_items(&raw.items))
}

fn collect_items(rows: &[RawItemRow]) -> Vec<LineItem> {
    rows.iter()
        .filter(|row| !row.description.trim().is_empty())
        .map(|row| {
            let quantity = match parse_count(&row.quantity) {
                Some(quantity) if quantity > 0 => quantity,
                _ => defaults::ITEM_QUANTITY,
            };
            let unit_value = match parse_amount(&row.value) {
                Some(value) if value >= Decimal::ZERO => round_half_up(value),
                _ => defaults::ITEM_UNIT_VALUE,
            };
            LineItem::new(row.description.trim(), quantity, unit_value)
        })
        .collect()
}

fn amount_or(
    raw: &RawForm,
    field: FieldId,
    default: Decimal,
) -> Decimal {
    let input = raw.get(field);
    if input.trim().is_empty() {
        return default;
    }
    parse_amount(input).unwrap_or_else(|| {
        tracing::warn!(field = %field, input = %input, "invalid amount, using default");
        default
    })
}

fn count_or(
    raw: &RawForm,
    field: FieldId,
    default: u32,
) -> u32 {
    let input = raw.get(field);
    if input.trim().is_empty() {
        return default;
    }
    parse_count(input).unwrap_or_else(|| {
        tracing::warn!(field = %field, input = %input, "invalid count, using default");
        default
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // collect
    // =========================================================================

    #[test]
    fn blank_form_collects_to_defaults() {
        assert_eq!(collect(&RawForm::new()), FormState::default());
    }

    #[test]
    fn whitespace_only_fields_use_defaults() {
        let raw = RawForm::new().with(FieldId::ClientName, "   ");

        assert_eq!(collect(&raw).client_name, "Cliente");
    }

    #[test]
    fn applies_entered_values() {
        let raw = RawForm::new()
            .with(FieldId::CompanyName, "Acme")
            .with(FieldId::ClientName, "Bob")
            .with(FieldId::ServiceType, "design-grafico")
            .with(FieldId::ProjectValue, "1.500,75")
            .with(FieldId::ProjectDeadline, "12")
            .with(FieldId::BudgetTone, "amigavel")
            .with(FieldId::DiscountPercent, "10");

        let form = collect(&raw);

        assert_eq!(form.company_name, "Acme");
        assert_eq!(form.client_name, "Bob");
        assert_eq!(form.service_type, ServiceType::GraphicDesign);
        assert_eq!(form.project_value, dec!(1500.75));
        assert_eq!(form.project_deadline, 12);
        assert_eq!(form.budget_tone, Tone::Friendly);
        assert_eq!(form.discount_percent, dec!(10));
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        let raw = RawForm::new()
            .with(FieldId::ProjectValue, "mil reais")
            .with(FieldId::ProjectDeadline, "-4")
            .with(FieldId::SupportDays, "x");

        let form = collect(&raw);

        assert_eq!(form.project_value, dec!(1000));
        assert_eq!(form.project_deadline, 30);
        assert_eq!(form.support_days, 30);
    }

    #[test]
    fn unknown_codes_keep_their_fallbacks() {
        let raw = RawForm::new()
            .with(FieldId::ServiceType, "fotografia")
            .with(FieldId::PaymentMethod, "boleto");

        let form = collect(&raw);

        assert_eq!(form.service_type, ServiceType::Other("fotografia".to_string()));
        assert_eq!(form.payment_method, PaymentMethod::ToBeArranged);
    }

    // =========================================================================
    // item rows
    // =========================================================================

    #[test]
    fn drops_rows_without_description() {
        let mut raw = RawForm::new();
        raw.push_item(RawItemRow::new("", "2", "100"));
        raw.push_item(RawItemRow::new("  ", "1", "50"));
        raw.push_item(RawItemRow::new("Logo", "1", "500"));

        let form = collect(&raw);

        assert_eq!(form.items, vec![LineItem::new("Logo", 1, dec!(500))]);
    }

    #[test]
    fn coerces_quantity_and_value() {
        let mut raw = RawForm::new();
        raw.push_item(RawItemRow::new("Zero qty", "0", "10"));
        raw.push_item(RawItemRow::new("Bad qty", "abc", "10"));
        raw.push_item(RawItemRow::new("Negative value", "2", "-5"));
        raw.push_item(RawItemRow::new("Blank value", "3", ""));

        let items = collect(&raw).items;

        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[1].quantity, 1);
        assert_eq!(items[2].unit_value, dec!(0));
        assert_eq!(items[3].unit_value, dec!(0));
        assert_eq!(items[3].quantity, 3);
    }

    #[test]
    fn items_total_matches_collected_rows() {
        let mut raw = RawForm::new();
        raw.push_item(RawItemRow::new("Página", "3", "120,50"));
        raw.push_item(RawItemRow::new("Hospedagem", "", "99.90"));
        raw.push_item(RawItemRow::new("", "10", "1000"));

        assert_eq!(items_total(&raw), dec!(461.40));
    }

    #[test]
    fn remove_item_out_of_range_is_none() {
        let mut raw = RawForm::new();
        raw.push_item(RawItemRow::blank());

        assert_eq!(raw.remove_item(3), None);
        assert_eq!(raw.remove_item(0), Some(RawItemRow::blank()));
        assert!(raw.items.is_empty());
    }

    // =========================================================================
    // reverse mapping
    // =========================================================================

    #[test]
    fn raw_form_from_state_collects_back_to_equal_state() {
        let form = FormState {
            company_name: "Acme".to_string(),
            company_cnpj: "12.345.678/0001-90".to_string(),
            service_type: ServiceType::Other("fotografia".to_string()),
            project_value: dec!(2500.50),
            discount_percent: dec!(12.5),
            items: vec![LineItem::new("Logo", 2, dec!(350.25))],
            ..FormState::default()
        };

        assert_eq!(collect(&RawForm::from(&form)), form);
    }

    // =========================================================================
    // validation and completion
    // =========================================================================

    #[test]
    fn missing_required_lists_blank_fields_in_order() {
        let raw = RawForm::new().with(FieldId::ClientName, "Bob");

        let missing = missing_required(&raw);

        assert_eq!(
            missing,
            vec![FieldId::CompanyName, FieldId::ProjectDescription]
        );
        assert_eq!(
            missing_fields_message(&missing),
            "Por favor, preencha os campos obrigatórios: companyName, projectDescription"
        );
    }

    #[test]
    fn completion_reports_progress_messages() {
        let empty = completion(&RawForm::new());
        assert_eq!(empty.percent, 0);
        assert_eq!(empty.message(), "Preencha os dados para começar");

        let some = completion(&RawForm::new().with(FieldId::CompanyName, "Acme"));
        assert_eq!(some.percent, 13);
        assert_eq!(some.message(), "Continue preenchendo os dados...");

        let half = completion(
            &RawForm::new()
                .with(FieldId::CompanyName, "Acme")
                .with(FieldId::CompanyEmail, "a@acme.com")
                .with(FieldId::ClientName, "Bob")
                .with(FieldId::ClientEmail, "bob@x.com"),
        );
        assert_eq!(half.percent, 50);
        assert_eq!(half.message(), "Quase pronto! Preencha os campos restantes");

        let mut full = RawForm::new();
        for field in TRACKED_FIELDS {
            full.set(field, "x");
        }
        let full = completion(&full);
        assert_eq!(full.percent, 100);
        assert_eq!(full.message(), "Perfeito! Pronto para gerar o orçamento");
    }
}
