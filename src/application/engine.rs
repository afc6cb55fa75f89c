//! Assessment engine: Timed question state machine.
//!
//! The engine walks a question bank strictly forward:
//!
//! ```text
//! Presenting(q) -> Answering(q) -> resolved -> Presenting(q + 1) | Completed
//! ```
//!
//! All progress is driven by the host through four inputs: `tick` (once per
//! elapsed second), `select_token`, `remove_token` and `submit`. Each returns
//! a [`Transition`] describing what happened. Invalid inputs are ignored and
//! never mutate state.
//!
//! A question resolves exactly once, either by an explicit submit or when the
//! countdown reaches zero. Resolving the last question classifies the response
//! log and hands the [`AssessmentResult`] to the completion callback.

use crate::config::EngineConfig;
use crate::domain::{AssessmentResult, Question, QuestionBank, Response, Token};
use crate::ports::Clock;
use crate::LanternError;

/// Receives the final result. Called at most once.
pub type CompletionCallback = Box<dyn FnOnce(AssessmentResult) + Send>;

/// Notified whenever a single question times out. Observes only.
pub type TimeoutCallback = Box<dyn FnMut(&Response) + Send>;

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Question shown, nothing selected
    Presenting,
    /// At least one token selected
    Answering,
    /// Every question resolved, result emitted
    Completed,
}

/// Outcome of a single engine input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    /// Input rejected; state unchanged
    Ignored,
    /// Selection or countdown changed within the current question
    Updated,
    /// Question resolved and the next one is now presented
    Advanced(Response),
    /// Last question resolved and the result was emitted
    Completed(Response),
}

impl Transition {
    /// The response recorded by this transition, if it resolved a question.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Advanced(response) | Self::Completed(response) => Some(response),
            Self::Ignored | Self::Updated => None,
        }
    }

    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// One assessment session.
///
/// Owns its bank, countdown and response log exclusively. Dropping the engine
/// abandons the session without emitting a result.
pub struct AssessmentEngine<C: Clock> {
    bank: QuestionBank,
    config: EngineConfig,
    clock: C,

    phase: SessionPhase,
    current_index: usize,
    pending: Vec<Token>,
    time_remaining_secs: u32,
    question_started_at_ms: u64,
    responses: Vec<Response>,

    on_complete: Option<CompletionCallback>,
    on_timeout: Option<TimeoutCallback>,
}

impl<C: Clock> AssessmentEngine<C> {
    /// Validate the questions and start a session on the first one.
    ///
    /// # Errors
    /// Returns `LanternError::Bank` for an empty or malformed bank and
    /// `LanternError::Config` for an invalid configuration.
    pub fn new<F>(
        questions: Vec<Question>,
        config: EngineConfig,
        clock: C,
        on_complete: F,
    ) -> Result<Self, LanternError>
    where
        F: FnOnce(AssessmentResult) + Send + 'static,
    {
        let bank = QuestionBank::new(questions)?;
        Self::with_bank(bank, config, clock, on_complete)
    }

    /// Start a session on an already validated bank.
    ///
    /// # Errors
    /// Returns `LanternError::Config` for an invalid configuration.
    pub fn with_bank<F>(
        bank: QuestionBank,
        config: EngineConfig,
        clock: C,
        on_complete: F,
    ) -> Result<Self, LanternError>
    where
        F: FnOnce(AssessmentResult) + Send + 'static,
    {
        config.validate()?;

        let question_started_at_ms = clock.now_ms();
        tracing::info!(
            "Starting assessment: {} questions, {}s per question",
            bank.len(),
            config.per_question_timeout_secs
        );

        Ok(Self {
            time_remaining_secs: config.per_question_timeout_secs,
            bank,
            config,
            clock,
            phase: SessionPhase::Presenting,
            current_index: 0,
            pending: Vec::new(),
            question_started_at_ms,
            responses: Vec::new(),
            on_complete: Some(Box::new(on_complete)),
            on_timeout: None,
        })
    }

    /// Register a listener fired whenever a question times out.
    #[must_use]
    pub fn with_timeout_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&Response) + Send + 'static,
    {
        self.on_timeout = Some(Box::new(listener));
        self
    }

    // === Inputs ===

    /// One second elapsed. Reaching zero times the question out.
    pub fn tick(&mut self) -> Transition {
        if self.is_completed() {
            return Transition::Ignored;
        }

        self.time_remaining_secs = self.time_remaining_secs.saturating_sub(1);
        if self.time_remaining_secs == 0 {
            self.timeout()
        } else {
            Transition::Updated
        }
    }

    /// Append a token to the pending selection.
    ///
    /// Ignored after completion, for tokens already selected in this
    /// question, and for empty or separator-containing tokens.
    pub fn select_token(&mut self, token: impl Into<Token>) -> Transition {
        if self.is_completed() {
            return Transition::Ignored;
        }

        let token = token.into();
        if !token.is_valid() || self.pending.contains(&token) {
            return Transition::Ignored;
        }

        self.pending.push(token);
        self.phase = SessionPhase::Answering;
        Transition::Updated
    }

    /// Remove the token at `index` from the pending selection.
    pub fn remove_token(&mut self, index: usize) -> Transition {
        if self.phase != SessionPhase::Answering || index >= self.pending.len() {
            return Transition::Ignored;
        }

        self.pending.remove(index);
        if self.pending.is_empty() {
            self.phase = SessionPhase::Presenting;
        }
        Transition::Updated
    }

    /// Resolve the current question with the pending selection.
    ///
    /// Ignored when nothing is selected or the session is over.
    pub fn submit(&mut self) -> Transition {
        if self.phase != SessionPhase::Answering || self.pending.is_empty() {
            return Transition::Ignored;
        }
        let Some(question) = self.bank.get(self.current_index) else {
            return Transition::Ignored;
        };

        let elapsed_ms = self
            .clock
            .now_ms()
            .saturating_sub(self.question_started_at_ms);
        let response = Response::submitted(question, &self.pending, elapsed_ms);

        self.resolve(response)
    }

    // === Internal transitions ===

    fn timeout(&mut self) -> Transition {
        let Some(question) = self.bank.get(self.current_index) else {
            return Transition::Ignored;
        };

        let response = Response::timed_out(question, &self.pending, self.config.timeout_ms());
        tracing::info!(
            "Question {} timed out with {} token(s) selected",
            response.question_id,
            self.pending.len()
        );

        if let Some(listener) = self.on_timeout.as_mut() {
            listener(&response);
        }

        self.resolve(response)
    }

    fn resolve(&mut self, response: Response) -> Transition {
        tracing::debug!(
            "Question {} resolved: correct={}, {}ms",
            response.question_id,
            response.is_correct,
            response.response_time_ms
        );
        self.responses.push(response.clone());

        if self.current_index + 1 >= self.bank.len() {
            self.complete();
            return Transition::Completed(response);
        }

        self.current_index += 1;
        self.pending.clear();
        self.time_remaining_secs = self.config.per_question_timeout_secs;
        self.question_started_at_ms = self.clock.now_ms();
        self.phase = SessionPhase::Presenting;

        Transition::Advanced(response)
    }

    fn complete(&mut self) {
        self.phase = SessionPhase::Completed;
        self.pending.clear();
        self.time_remaining_secs = 0;

        let result = AssessmentResult::from_responses(self.responses.clone(), &self.config.thresholds);
        tracing::info!(
            "Assessment complete: {}/{} correct ({:.1}%) -> {}",
            result.correct_answers,
            result.total_questions,
            result.accuracy_percent,
            result.diagnosis
        );

        if let Some(on_complete) = self.on_complete.take() {
            on_complete(result);
        }
    }

    // === Read-only state ===

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    /// 0-based cursor into the bank.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question being answered; `None` once completed.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_completed() {
            None
        } else {
            self.bank.get(self.current_index)
        }
    }

    #[must_use]
    pub fn time_remaining_secs(&self) -> u32 {
        self.time_remaining_secs
    }

    #[must_use]
    pub fn pending_selection(&self) -> &[Token] {
        &self.pending
    }

    /// Responses recorded so far, in bank order.
    #[must_use]
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.bank.len()
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::domain::{Diagnosis, Difficulty, NO_ANSWER};

    fn question(id: u32, answer: &str) -> Question {
        let len = answer.split('-').count();
        Question::new(id, vec!["#000000".to_string(); len], answer, Difficulty::Easy)
    }

    fn engine(
        answers: &[&str],
        timeout_secs: u32,
    ) -> (AssessmentEngine<ManualClock>, ManualClock, Receiver<AssessmentResult>) {
        let clock = ManualClock::new();
        let (tx, rx) = mpsc::channel();
        let questions = answers
            .iter()
            .enumerate()
            .map(|(i, a)| question(i as u32 + 1, a))
            .collect();

        let engine = AssessmentEngine::new(
            questions,
            EngineConfig::with_timeout(timeout_secs),
            clock.clone(),
            move |result| {
                let _ = tx.send(result);
            },
        )
        .expect("Should create engine");

        (engine, clock, rx)
    }

    fn run_out_clock(engine: &mut AssessmentEngine<ManualClock>) -> Transition {
        loop {
            let t = engine.tick();
            if t.response().is_some() || t.is_ignored() {
                return t;
            }
        }
    }

    #[test]
    fn test_initial_state() {
        let (engine, _, _) = engine(&["red-green", "blue-red"], 15);

        assert_eq!(engine.phase(), SessionPhase::Presenting);
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.time_remaining_secs(), 15);
        assert!(engine.pending_selection().is_empty());
        assert_eq!(engine.current_question().map(|q| q.id), Some(1));
        assert_eq!(engine.total_questions(), 2);
    }

    #[test]
    fn test_construction_rejects_empty_bank() {
        let result = AssessmentEngine::new(vec![], EngineConfig::default(), ManualClock::new(), |_| {});
        assert!(matches!(result, Err(LanternError::Bank(_))));
    }

    #[test]
    fn test_construction_rejects_mismatched_question() {
        let bad = Question::new(1, vec!["#f00".into()], "red-green", Difficulty::Easy);
        let result = AssessmentEngine::new(vec![bad], EngineConfig::default(), ManualClock::new(), |_| {});
        assert!(matches!(result, Err(LanternError::Bank(_))));
    }

    #[test]
    fn test_construction_rejects_zero_timeout() {
        let result = AssessmentEngine::new(
            vec![question(1, "red")],
            EngineConfig::with_timeout(0),
            ManualClock::new(),
            |_| {},
        );
        assert!(matches!(result, Err(LanternError::Config(_))));
    }

    #[test]
    fn test_select_and_remove_tokens() {
        let (mut engine, _, _) = engine(&["red-green-blue"], 15);

        assert_eq!(engine.select_token("red"), Transition::Updated);
        assert_eq!(engine.phase(), SessionPhase::Answering);
        assert_eq!(engine.select_token("green"), Transition::Updated);
        assert_eq!(engine.select_token("red"), Transition::Ignored);
        assert_eq!(engine.pending_selection().len(), 2);

        assert_eq!(engine.remove_token(5), Transition::Ignored);
        assert_eq!(engine.remove_token(0), Transition::Updated);
        assert_eq!(engine.pending_selection(), &[Token::from("green")]);
        assert_eq!(engine.remove_token(0), Transition::Updated);
        assert_eq!(engine.phase(), SessionPhase::Presenting);
        assert_eq!(engine.remove_token(0), Transition::Ignored);
    }

    #[test]
    fn test_invalid_tokens_ignored() {
        let (mut engine, _, _) = engine(&["red"], 15);
        assert!(engine.select_token("").is_ignored());
        assert!(engine.select_token("red-green").is_ignored());
        assert_eq!(engine.phase(), SessionPhase::Presenting);
    }

    #[test]
    fn test_empty_submit_ignored() {
        let (mut engine, _, _) = engine(&["red"], 15);
        assert!(engine.submit().is_ignored());
        assert_eq!(engine.current_index(), 0);
        assert!(engine.responses().is_empty());
    }

    #[test]
    fn test_submit_records_latency_and_advances() {
        let (mut engine, clock, _) = engine(&["red-green", "blue-red"], 15);

        clock.advance_ms(2_340);
        let _ = engine.select_token("red");
        let _ = engine.select_token("green");
        let transition = engine.submit();

        let response = transition.response().expect("Should resolve");
        assert!(matches!(transition, Transition::Advanced(_)));
        assert!(response.is_correct);
        assert_eq!(response.response_time_ms, 2_340);

        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.phase(), SessionPhase::Presenting);
        assert!(engine.pending_selection().is_empty());
        assert_eq!(engine.time_remaining_secs(), 15);
    }

    #[test]
    fn test_latency_measured_from_question_presentation() {
        let (mut engine, clock, _) = engine(&["red", "blue"], 15);

        clock.advance_ms(1_000);
        let _ = engine.select_token("red");
        let _ = engine.submit();

        clock.advance_ms(700);
        let _ = engine.select_token("blue");
        let transition = engine.submit();
        assert_eq!(transition.response().map(|r| r.response_time_ms), Some(700));
    }

    #[test]
    fn test_duplicate_selection_not_duplicated_in_answer() {
        let (mut engine, _, _) = engine(&["red-green"], 15);

        let _ = engine.select_token("red");
        let _ = engine.select_token("red");
        let _ = engine.select_token("green");
        let transition = engine.submit();

        let response = transition.response().expect("Should resolve");
        assert_eq!(response.user_answer, "red-green");
        assert!(response.is_correct);
    }

    #[test]
    fn test_order_matters() {
        let (mut engine, _, _) = engine(&["red-green"], 15);
        let _ = engine.select_token("green");
        let _ = engine.select_token("red");
        let transition = engine.submit();
        assert_eq!(transition.response().map(|r| r.is_correct), Some(false));
    }

    #[test]
    fn test_tick_counts_down_then_times_out() {
        let (mut engine, _, _) = engine(&["red", "green"], 3);

        assert_eq!(engine.tick(), Transition::Updated);
        assert_eq!(engine.time_remaining_secs(), 2);
        assert_eq!(engine.tick(), Transition::Updated);

        let transition = engine.tick();
        let response = transition.response().expect("Should time out");
        assert!(response.timed_out);
        assert_eq!(response.user_answer, NO_ANSWER);
        assert_eq!(response.response_time_ms, 3_000);

        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.time_remaining_secs(), 3);
    }

    #[test]
    fn test_timeout_with_matching_selection_is_incorrect() {
        let (mut engine, _, _) = engine(&["red-green", "blue"], 2);

        let _ = engine.select_token("red");
        let _ = engine.select_token("green");
        let transition = run_out_clock(&mut engine);

        let response = transition.response().expect("Should time out");
        assert_eq!(response.user_answer, "red-green");
        assert!(!response.is_correct);
    }

    #[test]
    fn test_timer_resets_after_submit() {
        let (mut engine, _, _) = engine(&["red", "green"], 5);

        let _ = engine.tick();
        let _ = engine.tick();
        assert_eq!(engine.time_remaining_secs(), 3);

        let _ = engine.select_token("red");
        let _ = engine.submit();
        assert_eq!(engine.time_remaining_secs(), 5);
    }

    #[test]
    fn test_timeout_listener_notified() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let (engine, _, _) = engine(&["red", "green"], 1);
        let mut engine = engine.with_timeout_listener(move |r| {
            if let Ok(mut v) = sink.lock() {
                v.push(r.question_id);
            }
        });

        let _ = engine.tick();
        let _ = engine.select_token("green");
        let _ = engine.submit();

        assert_eq!(*seen.lock().expect("Should lock"), vec![1]);
    }

    #[test]
    fn test_completed_session_is_inert() {
        let (mut engine, _, rx) = engine(&["red"], 2);

        let _ = engine.select_token("red");
        assert!(matches!(engine.submit(), Transition::Completed(_)));
        assert!(engine.is_completed());
        assert!(engine.current_question().is_none());

        for _ in 0..10 {
            assert!(engine.tick().is_ignored());
        }
        assert!(engine.select_token("green").is_ignored());
        assert!(engine.remove_token(0).is_ignored());
        assert!(engine.submit().is_ignored());
        assert_eq!(engine.responses().len(), 1);

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err(), "Completion must fire exactly once");
    }

    #[test]
    fn test_end_to_end_two_questions() {
        let (mut engine, clock, rx) = engine(&["red-green", "blue-red"], 15);

        clock.advance_ms(1_500);
        let _ = engine.select_token("red");
        let _ = engine.select_token("green");
        assert!(matches!(engine.submit(), Transition::Advanced(_)));

        let last = run_out_clock(&mut engine);
        assert!(matches!(last, Transition::Completed(_)));

        let result = rx.try_recv().expect("Should emit result");
        assert_eq!(result.total_questions, 2);
        assert_eq!(result.correct_answers, 1);
        assert!((result.accuracy_percent - 50.0).abs() < f64::EPSILON);
        assert_eq!(result.diagnosis, Diagnosis::MildDeficiency);
        assert_eq!(result.diagnosis.to_string(), "Mild Color Vision Deficiency");
        assert_eq!(result.responses.len(), 2);
        assert_eq!(result.responses[1].user_answer, "no-answer");
        assert!(!result.responses[1].is_correct);
        assert_eq!(result.timed_out_count(), 1);
    }

    #[test]
    fn test_dropping_engine_emits_nothing() {
        let (mut engine, _, rx) = engine(&["red", "green"], 15);
        let _ = engine.select_token("red");
        let _ = engine.submit();
        drop(engine);

        assert!(rx.try_recv().is_err());
    }
}
