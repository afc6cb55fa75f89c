//! # Lantern
//!
//! Timed color-vision screening engine.
//!
//! This crate provides:
//! - A timed assessment state machine driven by ticks and user actions
//! - A pure classifier mapping responses to a diagnosis with recommendations
//! - Terminal UI host for local administration of the test
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (Question, Response, Diagnosis, AssessmentResult)
//! - `ports`: Trait definitions for host collaborators (Clock)
//! - `adapters`: Concrete implementations (system/manual clocks, JSON banks)
//! - `application`: The assessment engine
//! - `config`: Environment-driven configuration
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{AssessmentEngine, SessionPhase, Transition};
pub use config::{AppConfig, EngineConfig};
pub use domain::{AssessmentResult, Diagnosis, Question, QuestionBank, Response, Token};

/// Result type for Lantern operations
pub type Result<T> = std::result::Result<T, LanternError>;

/// Main error type for Lantern
#[derive(Debug, thiserror::Error)]
pub enum LanternError {
    #[error("Invalid question bank: {0}")]
    Bank(#[from] domain::BankError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
