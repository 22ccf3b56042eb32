//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching the pricing service
//! - `convert.rs` — conversions from wire to domain types
//! - `client.rs` — gateway trait / HTTP adapter
//! - state and pure logic modules where the domain needs them

pub mod calculator;
pub mod quote;
