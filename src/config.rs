//! Calculator configuration — injected at construction, not hardcoded.

use crate::error::SdkError;
use rust_decimal::Decimal;
use std::time::Duration;

/// Deployment configuration for one calculator instance.
///
/// The defaults match the production RUB → USDT widget; embedders supply
/// their own values through [`crate::CalculatorBuilder::config`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    /// Currency pair identifier understood by the pricing service.
    pub pair_id: u32,
    /// Inclusive lower bound for the IN amount.
    pub in_amount_min: Decimal,
    /// Inclusive upper bound for the IN amount.
    pub in_amount_max: Decimal,
    /// Smallest increment for the IN amount; its fractional digit count
    /// defines the IN decimal limit.
    pub step_in: Decimal,
    /// Smallest increment for the OUT amount.
    pub step_out: Decimal,
    /// Throttle window and pacing delay between range-derivation requests.
    pub request_delay: Duration,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            pair_id: 133,
            in_amount_min: Decimal::new(10_000, 0),
            in_amount_max: Decimal::new(70_000_000, 0),
            step_in: Decimal::new(100, 0),
            step_out: Decimal::new(1, 6), // 0.000001
            request_delay: Duration::from_millis(1000),
        }
    }
}

impl CalculatorConfig {
    /// Check the invariants the rest of the crate relies on.
    ///
    /// The IN range must be non-degenerate (percentage conversion divides by
    /// `max - min`) and steps must be positive.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.in_amount_min >= self.in_amount_max {
            return Err(SdkError::Validation(format!(
                "in_amount_min ({}) must be < in_amount_max ({})",
                self.in_amount_min, self.in_amount_max
            )));
        }
        if self.step_in <= Decimal::ZERO || self.step_out <= Decimal::ZERO {
            return Err(SdkError::Validation(format!(
                "steps must be positive (step_in={}, step_out={})",
                self.step_in, self.step_out
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CalculatorConfig::default().validate().is_ok());
        assert_eq!(
            CalculatorConfig::default().step_out,
            Decimal::from_str("0.000001").unwrap()
        );
    }

    #[test]
    fn test_degenerate_range_rejected() {
        let config = CalculatorConfig {
            in_amount_min: Decimal::new(100, 0),
            in_amount_max: Decimal::new(100, 0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_step_rejected() {
        let config = CalculatorConfig {
            step_in: Decimal::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
