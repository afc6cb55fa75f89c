//! Question bank types.
//!
//! A question shows an ordered set of colored lights (the stimuli) and expects
//! the user to name them in order. Answers are sequences of tokens joined by
//! [`ANSWER_SEPARATOR`], compared token-for-token.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Separator used when joining answer tokens into a single answer string.
pub const ANSWER_SEPARATOR: &str = "-";

/// A single selectable answer unit (a color name such as `red`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Create a token, normalizing to trimmed lowercase.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A token is usable when it is non-empty and cannot be confused with
    /// the separator inside a joined answer.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.contains(ANSWER_SEPARATOR)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Join tokens into the canonical answer form (`red-green`).
#[must_use]
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join(ANSWER_SEPARATOR)
}

/// Difficulty tag. Informational only; it affects neither scoring nor timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Easy => write!(f, "EASY"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Hard => write!(f, "HARD"),
        }
    }
}

/// One assessment item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique within a bank
    pub id: u32,

    /// Displayed lights, in order (hex color values such as `#E53935`)
    pub stimuli: Vec<String>,

    /// Canonical answer: trimmed lowercase tokens joined by [`ANSWER_SEPARATOR`]
    pub correct_sequence: String,

    pub difficulty: Difficulty,
}

impl Question {
    #[must_use]
    pub fn new(
        id: u32,
        stimuli: Vec<String>,
        correct_sequence: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id,
            stimuli,
            correct_sequence: correct_sequence.into(),
            difficulty,
        }
    }

    /// Tokens of the canonical answer, in order.
    #[must_use]
    pub fn correct_tokens(&self) -> Vec<Token> {
        self.correct_sequence
            .split(ANSWER_SEPARATOR)
            .map(Token::new)
            .collect()
    }

    /// Number of tokens a complete answer contains.
    #[must_use]
    pub fn answer_len(&self) -> usize {
        self.stimuli.len()
    }

    fn validate(&self) -> Result<(), BankError> {
        let segments: Vec<&str> = self.correct_sequence.split(ANSWER_SEPARATOR).collect();

        if segments.len() != self.stimuli.len() {
            return Err(BankError::SequenceLengthMismatch {
                id: self.id,
                stimuli: self.stimuli.len(),
                tokens: segments.len(),
            });
        }

        let mut seen = HashSet::with_capacity(segments.len());
        for segment in segments {
            let token = Token::new(segment);
            if token.as_str().is_empty() {
                return Err(BankError::EmptyToken { id: self.id });
            }
            // Recorded answers copy the sequence verbatim, so it must already
            // be in the form selections are joined into.
            if token.as_str() != segment {
                return Err(BankError::NonCanonicalToken {
                    id: self.id,
                    token: segment.to_string(),
                });
            }
            if !seen.insert(token) {
                return Err(BankError::RepeatedAnswerToken {
                    id: self.id,
                    token: segment.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Errors raised while validating a question bank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankError {
    #[error("Question bank is empty")]
    Empty,

    #[error("Duplicate question id {0}")]
    DuplicateId(u32),

    #[error("Question {id}: {stimuli} stimuli but {tokens} answer tokens")]
    SequenceLengthMismatch { id: u32, stimuli: usize, tokens: usize },

    #[error("Question {id}: answer token '{token}' appears more than once")]
    RepeatedAnswerToken { id: u32, token: String },

    #[error("Question {id}: correct sequence contains an empty token")]
    EmptyToken { id: u32 },

    #[error("Question {id}: answer token '{token}' must be trimmed lowercase")]
    NonCanonicalToken { id: u32, token: String },
}

/// Ordered, validated, non-empty list of questions.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Validate and wrap a list of questions.
    ///
    /// # Errors
    /// Returns the first [`BankError`] found, in bank order.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut ids = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !ids.insert(question.id) {
                return Err(BankError::DuplicateId(question.id));
            }
            question.validate()?;
        }

        Ok(Self { questions })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Every token used by any correct sequence, sorted and de-duplicated.
    #[must_use]
    pub fn answer_palette(&self) -> Vec<Token> {
        self.questions
            .iter()
            .flat_map(Question::correct_tokens)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
