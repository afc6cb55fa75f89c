//! Question bank loading.
//!
//! Banks are JSON arrays of questions:
//!
//! ```json
//! [{ "id": 1, "stimuli": ["#E53935", "#43A047"], "correct_sequence": "red-green", "difficulty": "easy" }]
//! ```
//!
//! The built-in Lantern bank is embedded from `data/lantern_bank.json`.

use std::path::Path;

use crate::domain::{Question, QuestionBank};
use crate::LanternError;

const BUILTIN_BANK: &str = include_str!("../../data/lantern_bank.json");

/// Parse questions from JSON text without validating them.
///
/// # Errors
/// Returns `LanternError::Serialization` on malformed JSON.
pub fn parse_questions(json: &str) -> Result<Vec<Question>, LanternError> {
    Ok(serde_json::from_str(json)?)
}

/// Load and validate a bank from a JSON file.
///
/// # Errors
/// Returns an I/O, serialization, or bank validation error.
pub fn load_bank(path: &Path) -> Result<QuestionBank, LanternError> {
    let json = std::fs::read_to_string(path)?;
    let questions = parse_questions(&json)?;
    let bank = QuestionBank::new(questions)?;

    tracing::info!("Loaded {} questions from {:?}", bank.len(), path);
    Ok(bank)
}

/// The embedded eight-question Lantern bank.
///
/// # Errors
/// Only fails if the embedded data is corrupt.
pub fn builtin_bank() -> Result<QuestionBank, LanternError> {
    let questions = parse_questions(BUILTIN_BANK)?;
    Ok(QuestionBank::new(questions)?)
}
