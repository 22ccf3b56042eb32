//! Shared types and exact-decimal helpers used across all domain modules.
//!
//! All amount arithmetic in this crate goes through `rust_decimal::Decimal`;
//! binary floating point never touches money. The helpers here pin down the
//! crate-wide conventions: one rounding rule, one free-text parse, one
//! normalized display format.

pub mod decimal;

pub use decimal::{decimal_places, format_amount, parse_amount, round_amount};

use serde::{Deserialize, Serialize};

// ─── Field ───────────────────────────────────────────────────────────────────

/// One of the two linked amount fields: IN (amount sent) or OUT (amount
/// received).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    In,
    Out,
}

impl Field {
    /// The other side of the pair.
    pub fn opposite(&self) -> Field {
        match self {
            Field::In => Field::Out,
            Field::Out => Field::In,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::In => write!(f, "in"),
            Field::Out => write!(f, "out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_opposite() {
        assert_eq!(Field::In.opposite(), Field::Out);
        assert_eq!(Field::Out.opposite(), Field::In);
    }

    #[test]
    fn test_field_serde() {
        let f: Field = serde_json::from_str("\"in\"").unwrap();
        assert_eq!(f, Field::In);
        assert_eq!(serde_json::to_string(&Field::Out).unwrap(), "\"out\"");
    }
}
