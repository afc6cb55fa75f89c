//! Property-based tests for the assessment engine.
//!
//! These tests use proptest to verify, for arbitrary banks and answer plans:
//! - Exactly one response per question, in bank order
//! - Correctness is exact sequence equality with no partial credit
//! - Timed-out responses are never correct
//! - Classification is deterministic

#![cfg(test)]

use std::sync::mpsc;

use proptest::prelude::*;

use crate::adapters::clock::ManualClock;
use crate::application::{AssessmentEngine, Transition};
use crate::config::EngineConfig;
use crate::domain::{classify, Difficulty, Question, NO_ANSWER};

const PALETTE: [&str; 5] = ["red", "green", "blue", "yellow", "white"];
const TIMEOUT_SECS: u32 = 3;

/// How the simulated user handles one question.
#[derive(Debug, Clone)]
enum Plan {
    /// Select the right tokens (each twice) and submit
    Correct,
    /// Select the right tokens in reverse and submit
    Reversed,
    /// Select the first `n` right tokens and let the clock run out
    Partial(usize),
    /// Select nothing and let the clock run out
    Silent,
}

// =============================================================================
// Arbitrary Generators
// =============================================================================

fn arb_answer() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(PALETTE.to_vec(), 1..=4).prop_shuffle()
}

fn arb_plan() -> impl Strategy<Value = Plan> {
    prop_oneof![
        Just(Plan::Correct),
        Just(Plan::Reversed),
        (0usize..=4).prop_map(Plan::Partial),
        Just(Plan::Silent),
    ]
}

fn arb_session() -> impl Strategy<Value = Vec<(Vec<&'static str>, Plan)>> {
    proptest::collection::vec((arb_answer(), arb_plan()), 1..8)
}

fn build_questions(session: &[(Vec<&'static str>, Plan)]) -> Vec<Question> {
    session
        .iter()
        .enumerate()
        .map(|(i, (answer, _))| {
            Question::new(
                i as u32 + 1,
                vec!["#808080".to_string(); answer.len()],
                answer.join("-"),
                Difficulty::Medium,
            )
        })
        .collect()
}

fn run_out_clock(engine: &mut AssessmentEngine<ManualClock>) -> Transition {
    loop {
        let t = engine.tick();
        if t.response().is_some() || t.is_ignored() {
            return t;
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_one_response_per_question_in_order(session in arb_session()) {
        let clock = ManualClock::new();
        let (tx, rx) = mpsc::channel();
        let questions = build_questions(&session);

        let mut engine = AssessmentEngine::new(
            questions.clone(),
            EngineConfig::with_timeout(TIMEOUT_SECS),
            clock.clone(),
            move |result| { let _ = tx.send(result); },
        ).expect("Should create engine");

        let mut expected_correct = 0usize;

        for (answer, plan) in &session {
            prop_assert!(!engine.is_completed());
            clock.advance_ms(250);

            let transition = match plan {
                Plan::Correct => {
                    for token in answer {
                        let _ = engine.select_token(*token);
                        let _ = engine.select_token(*token);
                    }
                    expected_correct += 1;
                    engine.submit()
                }
                Plan::Reversed => {
                    for token in answer.iter().rev() {
                        let _ = engine.select_token(*token);
                    }
                    if answer.len() == 1 {
                        expected_correct += 1;
                    }
                    engine.submit()
                }
                Plan::Partial(n) => {
                    for token in answer.iter().take(*n) {
                        let _ = engine.select_token(*token);
                    }
                    run_out_clock(&mut engine)
                }
                Plan::Silent => run_out_clock(&mut engine),
            };

            let response = transition.response().expect("Each plan resolves its question");
            prop_assert_eq!(response.is_correct, !response.timed_out && response.user_answer == response.correct_answer);
            if response.timed_out {
                prop_assert!(!response.is_correct);
            }
        }

        prop_assert!(engine.is_completed());
        prop_assert!(engine.tick().is_ignored());

        let result = rx.try_recv().expect("Should emit result");
        prop_assert!(rx.try_recv().is_err());
        prop_assert_eq!(result.responses.len(), questions.len());
        prop_assert_eq!(result.correct_answers, expected_correct);

        for (response, question) in result.responses.iter().zip(&questions) {
            prop_assert_eq!(response.question_id, question.id);
            if response.timed_out && response.user_answer != NO_ANSWER {
                prop_assert!(!response.user_answer.is_empty());
            }
        }

        let first = classify(&result.responses);
        let second = classify(&result.responses);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.diagnosis, result.diagnosis);
    }

    #[test]
    fn prop_accuracy_within_bounds(correct in 0usize..20, extra in 0usize..20) {
        let total = correct + extra;
        prop_assume!(total > 0);

        let responses: Vec<_> = (0..total)
            .map(|i| crate::domain::Response {
                question_id: i as u32,
                user_answer: "red".to_string(),
                correct_answer: "red".to_string(),
                is_correct: i < correct,
                response_time_ms: 0,
                timed_out: false,
            })
            .collect();

        let c = classify(&responses);
        prop_assert!((0.0..=100.0).contains(&c.accuracy_percent));
        prop_assert!(!c.recommendations.is_empty());
    }
}
