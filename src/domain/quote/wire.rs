//! Wire types for the pricing calc endpoint.

use crate::shared::Field;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request body for `POST /b2api/change/user/pair/calc`.
///
/// Exactly one of `in_amount`/`out_amount` is a number; the other is an
/// explicit `null`, signaling "solve for this side."
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalcRequest {
    pub pair_id: u32,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub in_amount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub out_amount: Option<Decimal>,
}

impl CalcRequest {
    /// Build a request that fixes `field` at `value` and asks the service to
    /// solve for the opposite side.
    pub fn solve_for(pair_id: u32, field: Field, value: Decimal) -> Self {
        let (in_amount, out_amount) = match field {
            Field::In => (Some(value), None),
            Field::Out => (None, Some(value)),
        };
        Self {
            pair_id,
            in_amount,
            out_amount,
        }
    }
}

/// Success response body.
///
/// Amounts arrive as decimal strings to avoid floating-point transmission
/// loss; `price` is the two-element rate fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalcResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub in_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub out_amount: Decimal,
    pub price: [String; 2],
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_request_solves_for_the_other_side() {
        let req = CalcRequest::solve_for(133, Field::In, Decimal::new(10_000, 0));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["pairId"], 133);
        assert_eq!(json["inAmount"], 10_000.0);
        assert!(json["outAmount"].is_null());

        let req = CalcRequest::solve_for(133, Field::Out, Decimal::new(5, 1));
        let json = serde_json::to_value(&req).unwrap();
        assert!(json["inAmount"].is_null());
        assert_eq!(json["outAmount"], 0.5);
    }

    #[test]
    fn test_response_parses_string_amounts() {
        let resp: CalcResponse = serde_json::from_str(
            r#"{"inAmount":"10000","outAmount":"106.709241","price":["93.71","0.0106709241"]}"#,
        )
        .unwrap();
        assert_eq!(resp.in_amount, Decimal::new(10_000, 0));
        assert_eq!(resp.out_amount, Decimal::from_str("106.709241").unwrap());
        assert_eq!(resp.price[0], "93.71");
    }
}
