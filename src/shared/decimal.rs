//! Exact-decimal helpers for amount strings.
//!
//! Free-text input, wire amounts, and display values all pass through the
//! functions here, so parsing tolerance and rounding are identical everywhere
//! an amount is touched.

use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;

/// Number of fractional digits in a step value.
///
/// A field's decimal limit is derived from its step: `step = 0.000001` allows
/// six fractional digits, `step = 100` allows none.
pub fn decimal_places(step: &Decimal) -> u32 {
    step.normalize().scale()
}

/// Round to `dp` decimal places, half away from zero.
///
/// The single rounding rule of the crate — every displayed or converted
/// amount uses it.
pub fn round_amount(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse free-text numeric input into a `Decimal`.
///
/// Tolerates the transient shapes an edit surface produces: surrounding
/// whitespace, a locale comma as the separator, and a trailing separator
/// ("5." parses as 5). Empty or non-numeric text yields `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let mut text = raw.trim().replace(',', ".");
    if let Some(stripped) = text.strip_suffix('.') {
        text = stripped.to_string();
    }
    if text.starts_with('.') {
        text.insert(0, '0');
    }
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text).ok()
}

/// Normalized decimal string: no trailing fractional zeros, no exponent.
pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}
