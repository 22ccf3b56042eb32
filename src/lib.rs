//! # paircalc SDK
//!
//! A Rust SDK for a two-sided currency exchange calculator: the user edits
//! the amount to send (IN) or the amount to receive (OUT), and a remote
//! pricing service solves for the other side. The crate owns the hard parts —
//! bounded numeric input validation, exact-decimal percentage↔value
//! conversion, and a throttled, race-free recalculation coordinator — and
//! leaves rendering to the embedder.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared types, exact-decimal helpers, domain models
//! 2. **HTTP API** — `PricingHttp` for the pricing calc endpoint
//! 3. **Coordinator** — `Calculator` with throttled recalculation and
//!    observable state snapshots
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use paircalc_sdk::prelude::*;
//!
//! let calculator = Calculator::builder()
//!     .http_gateway(DEFAULT_API_URL, DEFAULT_SERIAL)
//!     .config(CalculatorConfig::default())
//!     .build()?;
//!
//! let mut states = calculator.subscribe();
//! calculator.handle_input_change("25000", Field::In).await;
//! states.changed().await?;
//! println!("{}", states.borrow().field(Field::Out).value);
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared types and exact-decimal helpers used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network constants for the pricing service.
pub mod network;

/// Calculator configuration.
pub mod config;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client for the pricing calc endpoint.
#[cfg(feature = "http")]
pub mod http;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared types + decimal helpers
    pub use crate::shared::{decimal_places, format_amount, parse_amount, round_amount, Field};

    // Domain types — quote
    pub use crate::domain::quote::wire::{CalcRequest, CalcResponse};
    pub use crate::domain::quote::{PricingGateway, Quote, RateFingerprint};

    // Domain types — calculator
    pub use crate::domain::calculator::input::{
        apply_change, apply_key, apply_paste, settle, ChangeVerdict, InputRules, Key, KeyVerdict,
    };
    pub use crate::domain::calculator::percent::{
        percentage_from_value, percentage_step, value_from_percentage, PERCENT_DP,
    };
    pub use crate::domain::calculator::{
        AmountField, Calculator, CalculatorBuilder, CalculatorState,
    };

    // Errors
    pub use crate::error::{HttpError, SdkError};

    // Configuration + network
    pub use crate::config::CalculatorConfig;
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_SERIAL};

    // HTTP gateway
    #[cfg(feature = "http")]
    pub use crate::domain::quote::HttpGateway;
    #[cfg(feature = "http")]
    pub use crate::http::PricingHttp;
}
