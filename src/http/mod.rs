//! HTTP client layer — `PricingHttp`.

pub mod client;

pub use client::PricingHttp;
