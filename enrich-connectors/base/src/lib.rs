//! Base crate for lookup connectors.
//!
//! Defines the query engine contract consumed by lookup filters, the connector
//! interfaces implemented per database and the generic engine tying them together.

pub mod common;
pub mod interface;

mod engine;
pub use engine::*;

#[cfg(any(test, feature = "test"))]
pub mod test;
