//! Quote domain — one priced conversion between the two sides of a pair.

pub mod client;
mod convert;
pub mod wire;

pub use client::PricingGateway;
#[cfg(feature = "http")]
pub use client::HttpGateway;

use crate::shared::Field;
use rust_decimal::Decimal;

/// An opaque rate identifier returned with every quote.
///
/// Used only for equality comparison — a changed fingerprint means the
/// exchange rate moved and derived ranges are stale. Never used for
/// arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateFingerprint(pub [String; 2]);

impl std::fmt::Display for RateFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0[0], self.0[1])
    }
}

/// A priced conversion: both side amounts plus the rate fingerprint that
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub in_amount: Decimal,
    pub out_amount: Decimal,
    pub price: RateFingerprint,
}

impl Quote {
    /// Amount on the given side.
    pub fn amount(&self, field: Field) -> Decimal {
        match field {
            Field::In => self.in_amount,
            Field::Out => self.out_amount,
        }
    }
}
