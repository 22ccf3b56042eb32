//! Calculator domain — two linked amount fields, percentage mapping, and the
//! coordinator that keeps them consistent through a remote pricing service.

pub mod coordinator;
pub mod input;
pub mod percent;

pub use coordinator::{Calculator, CalculatorBuilder};
pub use input::{ChangeVerdict, InputRules, Key, KeyVerdict};

use crate::config::CalculatorConfig;
use crate::domain::quote::Quote;
use crate::shared::{decimal_places, format_amount, parse_amount, Field};
use percent::{percentage_from_value, PERCENT_DP};
use rust_decimal::Decimal;

/// One side of the calculator: display text, cached percentage, bounds, step.
///
/// IN's range is configured; OUT's stays unknown until the coordinator
/// derives it from the pricing service, and the field is not interactive for
/// percentage purposes before that.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountField {
    /// The text currently shown/edited; may transiently look incomplete
    /// during typing (e.g. a trailing decimal point).
    pub value: String,
    /// Position of `value` within `[min, max]`, cached for display between
    /// settle points. Always re-derived from the value, never authoritative.
    pub percentage: Decimal,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub step: Decimal,
    /// Fractional digits allowed, derived from `step`.
    pub decimal_limit: u32,
}

impl AmountField {
    fn with_range(min: Decimal, max: Decimal, step: Decimal) -> Self {
        Self {
            value: "0".to_string(),
            percentage: Decimal::ZERO,
            min: Some(min),
            max: Some(max),
            step,
            decimal_limit: decimal_places(&step),
        }
    }

    fn pending(step: Decimal) -> Self {
        Self {
            value: "0".to_string(),
            percentage: Decimal::ZERO,
            min: None,
            max: None,
            step,
            decimal_limit: decimal_places(&step),
        }
    }

    /// The field's range, when known and non-degenerate.
    pub fn range(&self) -> Option<(Decimal, Decimal)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min < max => Some((min, max)),
            _ => None,
        }
    }

    /// Validator rules for this field.
    pub fn rules(&self, disabled: bool) -> InputRules {
        InputRules {
            min: self.min.unwrap_or(Decimal::ZERO),
            max: self.max.unwrap_or(Decimal::ZERO),
            step: self.step,
            decimal_limit: Some(self.decimal_limit),
            disabled,
        }
    }

    /// Re-derive the cached percentage from the current value.
    ///
    /// No-op while the range is unknown. An unparseable value reads as the
    /// minimum bound; out-of-range values clamp inside the converter.
    fn refresh_percentage(&mut self) {
        if let Some((min, max)) = self.range() {
            let value = parse_amount(&self.value).unwrap_or(min);
            self.percentage = percentage_from_value(min, max, value, Some(PERCENT_DP));
        }
    }
}

/// Snapshot of the whole calculator, published to subscribers after every
/// atomic mutation. Mutated only by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    /// True from construction until the initial OUT-range derivation settles.
    /// The view shows a blocking indicator and disables inputs while set.
    pub is_loading: bool,
    in_field: AmountField,
    out_field: AmountField,
}

impl CalculatorState {
    pub(crate) fn new(config: &CalculatorConfig) -> Self {
        Self {
            is_loading: true,
            in_field: AmountField::with_range(
                config.in_amount_min,
                config.in_amount_max,
                config.step_in,
            ),
            out_field: AmountField::pending(config.step_out),
        }
    }

    pub fn field(&self, which: Field) -> &AmountField {
        match which {
            Field::In => &self.in_field,
            Field::Out => &self.out_field,
        }
    }

    fn field_mut(&mut self, which: Field) -> &mut AmountField {
        match which {
            Field::In => &mut self.in_field,
            Field::Out => &mut self.out_field,
        }
    }

    /// Validator rules for a field; disabled while loading or while the
    /// field's range is still unknown.
    pub fn input_rules(&self, which: Field) -> InputRules {
        let field = self.field(which);
        field.rules(self.is_loading || field.range().is_none())
    }

    // ── Mutations (coordinator-only) ─────────────────────────────────────

    pub(crate) fn set_value(&mut self, which: Field, value: String) {
        let field = self.field_mut(which);
        field.value = value;
        field.refresh_percentage();
    }

    pub(crate) fn set_percentage(&mut self, which: Field, percentage: Decimal) {
        self.field_mut(which).percentage = percentage;
    }

    /// Snap a field to its minimum bound (zero if unknown) and return the
    /// numeric value it was snapped to.
    pub(crate) fn snap_to_min(&mut self, which: Field) -> Decimal {
        let field = self.field_mut(which);
        let min = field.min.unwrap_or(Decimal::ZERO);
        field.value = format_amount(min);
        field.percentage = Decimal::ZERO;
        min
    }

    pub(crate) fn set_out_range(&mut self, min: Decimal, max: Decimal) {
        self.out_field.min = Some(min);
        self.out_field.max = Some(max);
        self.out_field.refresh_percentage();
    }

    /// Write the counterpart side of a quote: the field opposite the edited
    /// one gets the responded amount and a freshly derived percentage.
    pub(crate) fn apply_counterpart(&mut self, edited: Field, quote: &Quote) {
        let other = edited.opposite();
        self.set_value(other, format_amount(quote.amount(other)));
    }
}
