//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Driving the assessment engine from keys and background ticks
//! - Receiving the final result through the completion callback

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::seq::SliceRandom;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::clock::SystemClock;
use crate::application::{AssessmentEngine, Transition};
use crate::config::EngineConfig;
use crate::domain::{AssessmentResult, QuestionBank, Token};

use super::ticker::{Ticker, TickerHandle, TICK_INTERVAL};
use super::ui::{
    assessment::{render_assessment, AssessmentView},
    intro::{render_intro, IntroState},
    render_disclaimer,
    result::render_result,
};

/// How long the timeout warning stays visible.
const TIMEOUT_WARNING: Duration = Duration::from_millis(1500);

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Intro,
    Assessment,
    Result,
}

/// A running session: the engine and the ticker driving its countdown.
///
/// Dropping it cancels the ticker and discards the engine.
struct ActiveSession {
    engine: AssessmentEngine<SystemClock>,
    ticker: TickerHandle,
}

/// Main application state
pub struct App {
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    bank: QuestionBank,
    config: EngineConfig,

    /// Running session (if any)
    session: Option<ActiveSession>,

    /// Answer palette, shuffled per session
    palette: Vec<Token>,
    cursor: usize,

    /// Completion callback channel
    result_tx: Sender<AssessmentResult>,
    result_rx: Receiver<AssessmentResult>,

    /// Timeout listener channel (question ids)
    timeout_tx: Sender<u32>,
    timeout_rx: Receiver<u32>,
    warning_until: Option<Instant>,

    result: Option<AssessmentResult>,
}

impl App {
    /// Create an application over a validated bank.
    ///
    /// # Errors
    /// Returns error if the engine configuration is invalid.
    pub fn new(bank: QuestionBank, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let (result_tx, result_rx) = mpsc::channel();
        let (timeout_tx, timeout_rx) = mpsc::channel();

        Ok(Self {
            screen: Screen::Intro,
            should_quit: false,
            palette: bank.answer_palette(),
            bank,
            config,
            session: None,
            cursor: 0,
            result_tx,
            result_rx,
            timeout_tx,
            timeout_rx,
            warning_until: None,
            result: None,
        })
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Tear down any live session before restoring the terminal
        self.session = None;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_ticker();
            self.poll_callbacks();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];
                let disclaimer_area = chunks[1];

                match self.screen {
                    Screen::Intro => render_intro(f, content_area, &self.intro_state()),
                    Screen::Assessment => {
                        if let Some(view) = self.assessment_view() {
                            render_assessment(f, content_area, &view);
                        }
                    }
                    Screen::Result => {
                        if let Some(result) = &self.result {
                            render_result(f, content_area, result);
                        }
                    }
                }

                render_disclaimer(f, disclaimer_area);
            })?;

            // Short poll keeps the countdown display responsive
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Feed delivered ticks into the engine.
    ///
    /// Ticks left over after a question resolves belong to the old countdown
    /// and are discarded along with its ticker.
    fn poll_ticker(&mut self) {
        let transition = {
            let Some(session) = self.session.as_mut() else {
                return;
            };

            let mut last = Transition::Ignored;
            for _ in 0..session.ticker.drain() {
                last = session.engine.tick();
                if last.response().is_some() {
                    break;
                }
            }

            if session.ticker.is_finished() {
                tracing::warn!("Ticker stopped during a session, restarting");
                session.ticker = Ticker::spawn(TICK_INTERVAL);
            }
            last
        };

        self.apply_transition(transition);
    }

    /// Drain the completion and timeout callback channels.
    fn poll_callbacks(&mut self) {
        while let Ok(question_id) = self.timeout_rx.try_recv() {
            tracing::debug!("Timeout warning for question {}", question_id);
            self.warning_until = Some(Instant::now() + TIMEOUT_WARNING);
        }

        if let Ok(result) = self.result_rx.try_recv() {
            self.result = Some(result);
            self.session = None;
            self.screen = Screen::Result;
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::Advanced(_) => {
                // Restart so the next countdown gets a full first second
                if let Some(session) = self.session.as_mut() {
                    session.ticker = Ticker::spawn(TICK_INTERVAL);
                }
                self.cursor = 0;
            }
            Transition::Completed(_) => {
                self.session = None;
                self.poll_callbacks();
            }
            Transition::Ignored | Transition::Updated => {}
        }
    }

    fn start_session(&mut self) {
        let result_tx = self.result_tx.clone();
        let timeout_tx = self.timeout_tx.clone();

        let engine = AssessmentEngine::with_bank(
            self.bank.clone(),
            self.config.clone(),
            SystemClock::new(),
            move |result| {
                let _ = result_tx.send(result);
            },
        );

        match engine {
            Ok(engine) => {
                let engine = engine.with_timeout_listener(move |response| {
                    let _ = timeout_tx.send(response.question_id);
                });

                self.palette.shuffle(&mut rand::thread_rng());
                self.cursor = 0;
                self.result = None;
                self.warning_until = None;
                self.session = Some(ActiveSession {
                    engine,
                    ticker: Ticker::spawn(TICK_INTERVAL),
                });
                self.screen = Screen::Assessment;
            }
            Err(e) => {
                tracing::error!("Failed to start assessment: {}", e);
            }
        }
    }

    fn abandon_session(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("Assessment abandoned");
        }
        self.screen = Screen::Intro;
    }

    fn intro_state(&self) -> IntroState {
        IntroState {
            question_count: self.bank.len(),
            timeout_secs: self.config.per_question_timeout_secs,
            palette: self.bank.answer_palette().iter().map(ToString::to_string).collect(),
        }
    }

    fn assessment_view(&self) -> Option<AssessmentView<'_>> {
        let engine = &self.session.as_ref()?.engine;

        Some(AssessmentView {
            question: engine.current_question()?,
            index: engine.current_index(),
            total: engine.total_questions(),
            time_remaining_secs: engine.time_remaining_secs(),
            timeout_secs: engine.config().per_question_timeout_secs,
            pending: engine.pending_selection(),
            palette: &self.palette,
            cursor: self.cursor,
            show_timeout_warning: self
                .warning_until
                .is_some_and(|until| Instant::now() < until),
        })
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Intro => self.handle_intro_key(key),
            Screen::Assessment => self.handle_assessment_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_intro_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => self.start_session(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_assessment_key(&mut self, key: KeyCode) {
        if key == KeyCode::Esc {
            self.abandon_session();
            return;
        }

        let palette_len = self.palette.len();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let engine = &mut session.engine;

        let transition = match key {
            KeyCode::Left => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(palette_len.saturating_sub(1));
                Transition::Ignored
            }
            KeyCode::Right => {
                self.cursor = if palette_len == 0 { 0 } else { (self.cursor + 1) % palette_len };
                Transition::Ignored
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.palette.get(self.cursor) {
                Some(token) => engine.select_token(token.clone()),
                None => Transition::Ignored,
            },
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                match self.palette.get(index) {
                    Some(token) => engine.select_token(token.clone()),
                    None => Transition::Ignored,
                }
            }
            KeyCode::Backspace => match engine.pending_selection().len() {
                0 => Transition::Ignored,
                len => engine.remove_token(len - 1),
            },
            KeyCode::Char('x') | KeyCode::Char('X') => {
                let position = self.palette.get(self.cursor).and_then(|token| {
                    engine.pending_selection().iter().position(|t| t == token)
                });
                match position {
                    Some(index) => engine.remove_token(index),
                    None => Transition::Ignored,
                }
            }
            KeyCode::Tab | KeyCode::Char('s') | KeyCode::Char('S') => engine.submit(),
            _ => Transition::Ignored,
        };

        self.apply_transition(transition);
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => self.start_session(),
            KeyCode::Esc => self.screen = Screen::Intro,
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }
}
