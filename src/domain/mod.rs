//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Domain types (validated, business-logic-ready)
//! - `wire.rs`: Raw serde structs matching backend responses
//! - `convert.rs`: `TryFrom` conversions with validation
//! - `client.rs`: Sub-client with HTTP methods

pub mod course;
pub mod enrollment;
