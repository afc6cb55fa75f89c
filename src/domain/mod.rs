//! Domain layer: Core assessment types and scoring.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable and validated at construction.

mod diagnosis;
mod question;
mod response;

pub use diagnosis::{
    classify, classify_with, AssessmentResult, Classification, ClassificationThresholds, Diagnosis,
};
pub use question::{join_tokens, BankError, Difficulty, Question, QuestionBank, Token, ANSWER_SEPARATOR};
pub use response::{Response, NO_ANSWER};
