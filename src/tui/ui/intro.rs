//! Intro view: instructions before a session starts.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{render_header, render_key_hints};
use crate::tui::styles::MedicalTheme;

/// What the intro screen needs to know.
pub struct IntroState {
    pub question_count: usize,
    pub timeout_secs: u32,
    pub palette: Vec<String>,
}

pub fn render_intro(f: &mut Frame, area: Rect, state: &IntroState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Instructions
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Color Vision Screening", "Lantern Test");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Each question shows a row of colored lights.",
            MedicalTheme::text(),
        )),
        Line::from(Span::styled(
            "Name the colors from left to right by picking them from the palette, then submit.",
            MedicalTheme::text(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Questions: ", MedicalTheme::text_secondary()),
            Span::styled(state.question_count.to_string(), MedicalTheme::subtitle()),
            Span::styled("   Time per question: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{}s", state.timeout_secs), MedicalTheme::subtitle()),
        ]),
        Line::from(vec![
            Span::styled("Palette: ", MedicalTheme::text_secondary()),
            Span::styled(state.palette.join(", "), MedicalTheme::text()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Unanswered questions count as incorrect when time runs out.",
            MedicalTheme::warning(),
        )),
    ];

    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border_focused()),
        );
    f.render_widget(body, chunks[1]);

    render_key_hints(f, chunks[2], &[("Enter", "Start"), ("Q", "Quit")]);
}
