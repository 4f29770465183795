//! Common utility functions for budget calculations.
//!
//! This module provides shared functionality used by the pricing summary and
//! the document composer: rounding, lenient parsing of form input, and the
//! Brazilian currency format used throughout the proposal.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a user-entered amount.
///
/// Accepts both `1234.56` and the pt-BR `1.234,56` / `1234,56` forms.
/// Returns `None` for blank or unparseable input; callers decide the fallback.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<Decimal>() {
        return Some(value);
    }
    if trimmed.contains(',') {
        let normalized = trimmed.replace('.', "").replace(',', ".");
        return normalized.parse().ok();
    }
    None
}

/// Parses a whole number of units (days, quantities).
///
/// Fractional input is truncated toward zero. Negative or unparseable input
/// yields `None`.
pub fn parse_count(input: &str) -> Option<u32> {
    let value = parse_amount(input)?.trunc();
    if value.is_sign_negative() {
        return None;
    }
    value.to_u32()
}

/// Formats an amount the way the proposal displays money: two decimals,
/// `.` as thousands separator and `,` as decimal separator.
///
/// The `R$` prefix is added by the caller.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::format_brl;
///
/// assert_eq!(format_brl(dec!(1234567.891)), "1.234.567,89");
/// assert_eq!(format_brl(dec!(0)), "0,00");
/// ```
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let mut magnitude = rounded.abs();
    magnitude.rescale(2);
    let text = magnitude.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped},{frac_part}")
    } else {
        format!("{grouped},{frac_part}")
    }
}

/// Formats a percentage without trailing zeros (`10`, `12.5`).
pub fn format_percent(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    // =========================================================================
    // parse_amount tests
    // =========================================================================

    #[test]
    fn parse_amount_accepts_dot_decimal() {
        assert_eq!(parse_amount("2500.50"), Some(dec!(2500.50)));
    }

    #[test]
    fn parse_amount_accepts_brazilian_format() {
        assert_eq!(parse_amount("1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount("99,9"), Some(dec!(99.9)));
    }

    #[test]
    fn parse_amount_trims_whitespace() {
        assert_eq!(parse_amount("  42  "), Some(dec!(42)));
    }

    #[test]
    fn parse_amount_rejects_blank_and_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("abc"), None);
    }

    // =========================================================================
    // parse_count tests
    // =========================================================================

    #[test]
    fn parse_count_truncates_fractions() {
        assert_eq!(parse_count("2.7"), Some(2));
    }

    #[test]
    fn parse_count_rejects_negative() {
        assert_eq!(parse_count("-3"), None);
    }

    #[test]
    fn parse_count_accepts_zero() {
        assert_eq!(parse_count("0"), Some(0));
    }

    // =========================================================================
    // format_brl tests
    // =========================================================================

    #[test]
    fn format_brl_groups_thousands() {
        assert_eq!(format_brl(dec!(1234.5)), "1.234,50");
        assert_eq!(format_brl(dec!(1000000)), "1.000.000,00");
    }

    #[test]
    fn format_brl_small_values() {
        assert_eq!(format_brl(dec!(450)), "450,00");
        assert_eq!(format_brl(dec!(0.005)), "0,01");
    }

    #[test]
    fn format_brl_negative_values() {
        assert_eq!(format_brl(dec!(-1500.25)), "-1.500,25");
    }

    #[test]
    fn format_percent_drops_trailing_zeros() {
        assert_eq!(format_percent(dec!(10.00)), "10");
        assert_eq!(format_percent(dec!(12.50)), "12.5");
    }
}
