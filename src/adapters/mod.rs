//! Adapters layer: Concrete implementations of ports and host I/O.
//!
//! - `clock`: system and manually advanced clocks
//! - `bank`: JSON question bank loading and the built-in Lantern bank

pub mod bank;
pub mod clock;
