//! Conversions: wire types → quote domain types.

use super::wire::CalcResponse;
use super::{Quote, RateFingerprint};

impl From<CalcResponse> for Quote {
    fn from(resp: CalcResponse) -> Self {
        Quote {
            in_amount: resp.in_amount,
            out_amount: resp.out_amount,
            price: RateFingerprint(resp.price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_response_into_quote() {
        let resp = CalcResponse {
            in_amount: Decimal::new(10_000, 0),
            out_amount: Decimal::new(106_709_241, 6),
            price: ["93.71".into(), "0.0106709241".into()],
        };
        let quote: Quote = resp.into();
        assert_eq!(quote.in_amount, Decimal::new(10_000, 0));
        assert_eq!(
            quote.price,
            RateFingerprint(["93.71".into(), "0.0106709241".into()])
        );
    }
}
