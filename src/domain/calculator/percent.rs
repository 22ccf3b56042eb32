//! Percentage ↔ value conversion over a `[min, max]` range.
//!
//! Percentage is always derived from the authoritative value, never stored
//! independently long-term; both directions use exact decimal arithmetic so a
//! slider position and its value cannot drift apart.

use crate::shared::{format_amount, round_amount};
use rust_decimal::Decimal;

/// Rounding precision for derived percentages — matches a slider step of
/// 0.0001.
pub const PERCENT_DP: u32 = 4;

/// Value at `percent` within `[min, max]`, rounded to `precision` decimal
/// places and returned as a normalized decimal string.
///
/// # Panics
///
/// If `percent` is outside `[0, 100]` — callers clamp to the slider/button
/// domain, so a violation is a programming error.
pub fn value_from_percentage(
    min: Decimal,
    max: Decimal,
    percent: Decimal,
    precision: u32,
) -> String {
    assert!(
        percent >= Decimal::ZERO && percent <= Decimal::ONE_HUNDRED,
        "percent must be within [0, 100], got {percent}"
    );

    let value = min + (max - min) * (percent / Decimal::ONE_HUNDRED);
    format_amount(round_amount(value, precision))
}

/// Percentage position of `value` within `[min, max]`.
///
/// `value` is clamped into the range first, so out-of-range inputs (e.g. from
/// server rounding) map to 0 or 100 instead of leaving the domain. Rounded to
/// `precision` decimal places when given, unrounded otherwise.
///
/// # Panics
///
/// If `min >= max` — a degenerate range is a caller bug.
pub fn percentage_from_value(
    min: Decimal,
    max: Decimal,
    value: Decimal,
    precision: Option<u32>,
) -> Decimal {
    assert!(min < max, "degenerate range: min {min} >= max {max}");

    let clamped = value.clamp(min, max);
    let percent = (clamped - min) / (max - min) * Decimal::ONE_HUNDRED;
    match precision {
        Some(dp) => round_amount(percent, dp),
        None => percent,
    }
}

/// Slider increment, in percentage points, such that every notch lands on a
/// step-aligned value of `[min, max]`.
pub fn percentage_step(min: Decimal, max: Decimal, step: Decimal) -> Decimal {
    let steps_count = (max - min) / step + Decimal::ONE;
    if steps_count > Decimal::ONE {
        Decimal::ONE_HUNDRED / (steps_count - Decimal::ONE)
    } else {
        Decimal::ONE_HUNDRED
    }
}
