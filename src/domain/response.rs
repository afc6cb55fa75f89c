//! Recorded outcome of a single question.

use serde::{Deserialize, Serialize};

use super::question::{join_tokens, Question, Token};

/// Answer recorded when a question times out with nothing selected.
pub const NO_ANSWER: &str = "no-answer";

/// One response per question, created exactly once and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Id of the question this answers
    pub question_id: u32,

    /// Selected tokens joined by the answer separator, or [`NO_ANSWER`]
    pub user_answer: String,

    /// Copy of the question's correct sequence at record time
    pub correct_answer: String,

    pub is_correct: bool,

    /// Time from presentation to submission (or to the deadline on timeout)
    pub response_time_ms: u64,

    /// Whether the countdown ran out before an explicit submit
    pub timed_out: bool,
}

impl Response {
    /// Build the response for an explicit submit.
    ///
    /// Correctness is exact sequence equality; there is no partial credit.
    #[must_use]
    pub fn submitted(question: &Question, selection: &[Token], response_time_ms: u64) -> Self {
        let user_answer = join_tokens(selection);
        let is_correct = user_answer == question.correct_sequence;

        Self {
            question_id: question.id,
            user_answer,
            correct_answer: question.correct_sequence.clone(),
            is_correct,
            response_time_ms,
            timed_out: false,
        }
    }

    /// Build the response for a question whose countdown expired.
    ///
    /// Timed-out answers never count as correct, whatever was selected.
    #[must_use]
    pub fn timed_out(question: &Question, selection: &[Token], response_time_ms: u64) -> Self {
        let user_answer = if selection.is_empty() {
            NO_ANSWER.to_string()
        } else {
            join_tokens(selection)
        };

        Self {
            question_id: question.id,
            user_answer,
            correct_answer: question.correct_sequence.clone(),
            is_correct: false,
            response_time_ms,
            timed_out: true,
        }
    }

    /// Whether the user gave no answer at all.
    #[must_use]
    pub fn is_unanswered(&self) -> bool {
        self.user_answer == NO_ANSWER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;

    fn red_green() -> Question {
        Question::new(
            1,
            vec!["#E53935".into(), "#43A047".into()],
            "red-green",
            Difficulty::Easy,
        )
    }

    #[test]
    fn test_submitted_exact_match_is_correct() {
        let response = Response::submitted(&red_green(), &["red".into(), "green".into()], 1200);
        assert!(response.is_correct);
        assert_eq!(response.user_answer, "red-green");
        assert_eq!(response.correct_answer, "red-green");
        assert_eq!(response.response_time_ms, 1200);
        assert!(!response.timed_out);
    }

    #[test]
    fn test_submitted_wrong_order_is_incorrect() {
        let response = Response::submitted(&red_green(), &["green".into(), "red".into()], 900);
        assert!(!response.is_correct);
        assert_eq!(response.user_answer, "green-red");
    }

    #[test]
    fn test_submitted_prefix_is_incorrect() {
        let response = Response::submitted(&red_green(), &["red".into()], 900);
        assert!(!response.is_correct);
    }

    #[test]
    fn test_correct_answer_copies_sequence_verbatim() {
        let question = Question::new(
            1,
            vec!["#E53935".into(), "#43A047".into()],
            "Red-Green",
            Difficulty::Easy,
        );

        let response = Response::submitted(&question, &["RED".into(), "green".into()], 10);
        assert_eq!(response.correct_answer, question.correct_sequence);
        assert_eq!(response.user_answer, "red-green");
        assert!(!response.is_correct);

        let response = Response::timed_out(&question, &[], 15_000);
        assert_eq!(response.correct_answer, question.correct_sequence);
    }

    #[test]
    fn test_timeout_without_selection_uses_sentinel() {
        let response = Response::timed_out(&red_green(), &[], 15_000);
        assert_eq!(response.user_answer, NO_ANSWER);
        assert!(response.is_unanswered());
        assert!(!response.is_correct);
        assert!(response.timed_out);
    }

    #[test]
    fn test_timeout_with_full_match_still_incorrect() {
        let response = Response::timed_out(&red_green(), &["red".into(), "green".into()], 15_000);
        assert_eq!(response.user_answer, "red-green");
        assert!(!response.is_correct);
    }
}
