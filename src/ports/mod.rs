//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the assessment engine and its host environment.

mod clock;

pub use clock::Clock;
