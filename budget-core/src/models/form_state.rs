use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::codes::{DeliveryType, PaymentMethod, ServiceType, Tone};

/// Values applied by the collector when a field is left blank.
pub mod defaults {
    use rust_decimal::Decimal;

    pub const COMPANY_NAME: &str = "Sua Empresa";
    pub const COMPANY_PHONE: &str = "(11) 99999-9999";
    pub const COMPANY_EMAIL: &str = "contato@empresa.com";
    pub const CLIENT_NAME: &str = "Cliente";
    pub const CLIENT_PHONE: &str = "(11) 88888-8888";
    pub const CLIENT_EMAIL: &str = "cliente@email.com";
    pub const SERVICE_TYPE: &str = "personalizado";
    pub const PROJECT_DESCRIPTION: &str = "Projeto personalizado";
    pub const PROJECT_VALUE: Decimal = Decimal::ONE_THOUSAND;
    pub const PROJECT_DEADLINE: u32 = 30;
    pub const BUDGET_TONE: &str = "profissional";
    pub const BUDGET_LANGUAGE: &str = "pt-BR";
    pub const BUDGET_COMPLEXITY: &str = "detalhado";
    pub const PAYMENT_METHOD: &str = "a-vista";
    pub const DISCOUNT_PERCENT: Decimal = Decimal::ZERO;
    pub const DELIVERY_TYPE: &str = "digital";
    pub const SUPPORT_DAYS: u32 = 30;
    pub const ITEM_QUANTITY: u32 = 1;
    pub const ITEM_UNIT_VALUE: Decimal = Decimal::ZERO;
}

/// One row of the itemized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// Always at least 1 once collected.
    pub quantity: u32,
    #[serde(rename = "value")]
    pub unit_value: Decimal,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_value: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_value,
        }
    }

    /// quantity × unit value, saturating at the `Decimal` range.
    pub fn total(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_value)
    }
}

/// Fully populated snapshot of the form.
///
/// Produced by [`crate::collector::collect`]; every field carries a value,
/// so the composer never branches on a missing field other than the three
/// optional identity lines (address, CNPJ and client company), which are
/// omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    // Company
    pub company_name: String,
    pub company_phone: String,
    pub company_email: String,
    pub company_address: String,
    #[serde(rename = "companyCNPJ")]
    pub company_cnpj: String,

    // Client
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub client_company: String,

    // Service
    pub service_type: ServiceType,
    pub project_description: String,
    pub project_value: Decimal,
    /// Business days.
    pub project_deadline: u32,

    // Presentation
    pub budget_tone: Tone,
    pub budget_language: String,
    pub budget_complexity: String,
    pub payment_method: PaymentMethod,
    pub discount_percent: Decimal,
    pub delivery_type: DeliveryType,
    pub support_days: u32,

    pub items: Vec<LineItem>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            company_name: defaults::COMPANY_NAME.to_string(),
            company_phone: defaults::COMPANY_PHONE.to_string(),
            company_email: defaults::COMPANY_EMAIL.to_string(),
            company_address: String::new(),
            company_cnpj: String::new(),
            client_name: defaults::CLIENT_NAME.to_string(),
            client_phone: defaults::CLIENT_PHONE.to_string(),
            client_email: defaults::CLIENT_EMAIL.to_string(),
            client_company: String::new(),
            service_type: ServiceType::parse(defaults::SERVICE_TYPE),
            project_description: defaults::PROJECT_DESCRIPTION.to_string(),
            project_value: defaults::PROJECT_VALUE,
            project_deadline: defaults::PROJECT_DEADLINE,
            budget_tone: Tone::parse(defaults::BUDGET_TONE),
            budget_language: defaults::BUDGET_LANGUAGE.to_string(),
            budget_complexity: defaults::BUDGET_COMPLEXITY.to_string(),
            payment_method: PaymentMethod::parse(defaults::PAYMENT_METHOD),
            discount_percent: defaults::DISCOUNT_PERCENT,
            delivery_type: DeliveryType::parse(defaults::DELIVERY_TYPE),
            support_days: defaults::SUPPORT_DAYS,
            items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn line_item_total_multiplies_quantity() {
        assert_eq!(LineItem::new("Página", 3, dec!(120.50)).total(), dec!(361.50));
    }

    #[test]
    fn line_item_total_saturates() {
        assert_eq!(LineItem::new("Servidor", 2, Decimal::MAX).total(), Decimal::MAX);
    }

    #[test]
    fn default_form_uses_documented_codes() {
        let form = FormState::default();

        assert_eq!(form.service_type, ServiceType::Custom);
        assert_eq!(form.budget_tone, Tone::Professional);
        assert_eq!(form.payment_method, PaymentMethod::Upfront);
        assert_eq!(form.delivery_type, DeliveryType::Digital);
        assert_eq!(form.project_value, dec!(1000));
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let form = FormState {
            company_cnpj: "12.345.678/0001-90".to_string(),
            items: vec![LineItem::new("Logo", 1, dec!(500))],
            ..FormState::default()
        };

        let json = serde_json::to_value(&form).expect("serialize form");

        assert_eq!(json["companyName"], "Sua Empresa");
        assert_eq!(json["companyCNPJ"], "12.345.678/0001-90");
        assert_eq!(json["budgetTone"], "profissional");
        assert_eq!(json["items"][0]["description"], "Logo");
        assert_eq!(json["items"][0]["quantity"], 1);
        assert!(json["items"][0].get("value").is_some());
    }

    #[test]
    fn missing_keys_deserialize_to_defaults() {
        let form: FormState =
            serde_json::from_str(r#"{"companyName":"Acme","projectValue":"750"}"#)
                .expect("deserialize partial form");

        assert_eq!(form.company_name, "Acme");
        assert_eq!(form.project_value, dec!(750));
        assert_eq!(form.client_name, "Cliente");
        assert!(form.items.is_empty());
    }
}
