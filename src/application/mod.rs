//! Application layer: The assessment engine.
//!
//! This module drives a session over the domain types, using the
//! `Clock` port for response latency.

mod engine;
mod proptest;

pub use engine::{AssessmentEngine, CompletionCallback, SessionPhase, TimeoutCallback, Transition};
