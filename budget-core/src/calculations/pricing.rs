//! Investment totals for a proposal.
//!
//! | Value            | Rule |
//! |------------------|------|
//! | `items_total`    | Σ quantity × unit value over the line items |
//! | `total_value`    | `items_total` when the item list is non-empty, else the project value |
//! | `discount_value` | `total_value` × discount percent / 100, rounded half-up to cents |
//! | `final_value`    | `total_value` − `discount_value` |
//!
//! The discount is rounded before subtracting so the amounts printed in the
//! discount callout always satisfy `original − discount = final`.
//!
//! Every step saturates at the `Decimal` range instead of overflowing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::{FormState, LineItem};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Totals rendered in the item table and the investment block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSummary {
    /// Sum of every line item's total (zero when there are no items).
    pub items_total: Decimal,

    /// Amount before discount.
    pub total_value: Decimal,

    /// Discount percent as entered.
    pub discount_percent: Decimal,

    /// Discount amount, rounded to cents.
    pub discount_value: Decimal,

    /// Amount the client pays.
    pub final_value: Decimal,
}

impl PricingSummary {
    /// Computes the summary for a collected form.
    pub fn from_form(form: &FormState) -> Self {
        let items_total = items_total(&form.items);

        let total_value = if form.items.is_empty() {
            form.project_value
        } else {
            items_total
        };

        let discount_value = Self::discount_value(total_value, form.discount_percent);

        Self {
            items_total,
            total_value,
            discount_percent: form.discount_percent,
            discount_value,
            final_value: total_value.saturating_sub(discount_value),
        }
    }

    /// Whether the discount callout should be rendered.
    pub fn has_discount(&self) -> bool {
        self.discount_percent > Decimal::ZERO
    }

    fn discount_value(
        total_value: Decimal,
        discount_percent: Decimal,
    ) -> Decimal {
        if discount_percent <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let discount = match total_value.checked_mul(discount_percent) {
            Some(product) => product / ONE_HUNDRED,
            None => (total_value / ONE_HUNDRED).saturating_mul(discount_percent),
        };
        round_half_up(discount)
    }
}

/// Σ quantity × unit value.
pub fn items_total(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.total()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn form_with(
        items: Vec<LineItem>,
        project_value: Decimal,
        discount_percent: Decimal,
    ) -> FormState {
        FormState {
            items,
            project_value,
            discount_percent,
            ..FormState::default()
        }
    }

    #[test]
    fn uses_project_value_when_no_items() {
        let summary = PricingSummary::from_form(&form_with(vec![], dec!(2500), dec!(0)));

        assert_eq!(summary.items_total, dec!(0));
        assert_eq!(summary.total_value, dec!(2500));
        assert_eq!(summary.final_value, dec!(2500));
        assert!(!summary.has_discount());
    }

    #[test]
    fn items_override_project_value() {
        let items = vec![
            LineItem::new("Logo", 1, dec!(500)),
            LineItem::new("Cartão de visita", 2, dec!(150.50)),
        ];

        let summary = PricingSummary::from_form(&form_with(items, dec!(999), dec!(0)));

        assert_eq!(summary.items_total, dec!(801.00));
        assert_eq!(summary.total_value, dec!(801.00));
    }

    #[test]
    fn zero_valued_items_still_override_project_value() {
        let items = vec![LineItem::new("Reunião inicial", 1, dec!(0))];

        let summary = PricingSummary::from_form(&form_with(items, dec!(999), dec!(0)));

        assert_eq!(summary.total_value, dec!(0));
    }

    #[test]
    fn applies_discount_to_items_total() {
        let items = vec![LineItem::new("Logo", 1, dec!(500))];

        let summary = PricingSummary::from_form(&form_with(items, dec!(999), dec!(10)));

        assert_eq!(summary.total_value, dec!(500));
        assert_eq!(summary.discount_value, dec!(50.00));
        assert_eq!(summary.final_value, dec!(450.00));
        assert!(summary.has_discount());
    }

    #[test]
    fn discount_is_rounded_to_cents() {
        let summary = PricingSummary::from_form(&form_with(vec![], dec!(333.33), dec!(12.5)));

        // 333.33 * 0.125 = 41.66625
        assert_eq!(summary.discount_value, dec!(41.67));
        assert_eq!(
            summary.total_value - summary.discount_value,
            summary.final_value
        );
    }

    #[test]
    fn negative_discount_is_ignored() {
        let summary = PricingSummary::from_form(&form_with(vec![], dec!(1000), dec!(-5)));

        assert_eq!(summary.discount_value, dec!(0));
        assert_eq!(summary.final_value, dec!(1000));
    }

    #[test]
    fn huge_item_values_saturate_instead_of_overflowing() {
        let items = vec![
            LineItem::new("Servidor", 2, Decimal::MAX),
            LineItem::new("Suporte", 1, Decimal::MAX),
        ];

        let summary = PricingSummary::from_form(&form_with(items, dec!(0), dec!(10)));

        assert_eq!(summary.items_total, Decimal::MAX);
        assert_eq!(summary.total_value, Decimal::MAX);
        assert!(summary.discount_value > Decimal::ZERO);
        assert!(summary.final_value < summary.total_value);
    }

    #[test]
    fn discount_on_maximum_project_value_does_not_overflow() {
        let summary = PricingSummary::from_form(&form_with(vec![], Decimal::MAX, dec!(10)));

        assert_eq!(
            summary.discount_value,
            round_half_up(Decimal::MAX / ONE_HUNDRED * dec!(10))
        );
        assert_eq!(
            summary.final_value,
            Decimal::MAX - summary.discount_value
        );
    }
}
