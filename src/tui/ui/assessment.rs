//! Assessment view: stimulus lights, countdown and answer palette.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::{render_header, render_key_hints};
use crate::domain::{Question, Token};
use crate::tui::styles::MedicalTheme;

/// Snapshot of the running session for one frame.
pub struct AssessmentView<'a> {
    pub question: &'a Question,
    pub index: usize,
    pub total: usize,
    pub time_remaining_secs: u32,
    pub timeout_secs: u32,
    pub pending: &'a [Token],
    pub palette: &'a [Token],
    pub cursor: usize,
    /// A question just timed out
    pub show_timeout_warning: bool,
}

pub fn render_assessment(f: &mut Frame, area: Rect, view: &AssessmentView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(3), // Countdown
            Constraint::Min(5),    // Lights
            Constraint::Length(3), // Selection
            Constraint::Length(3), // Palette
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(
        f,
        chunks[0],
        &format!("Question {} of {}", view.index + 1, view.total),
        &view.question.difficulty.to_string(),
    );
    render_countdown(f, chunks[1], view);
    render_lights(f, chunks[2], view.question);
    render_selection(f, chunks[3], view);
    render_palette(f, chunks[4], view);
    render_key_hints(
        f,
        chunks[5],
        &[
            ("←/→", "Move"),
            ("Enter", "Pick"),
            ("1-9", "Pick #"),
            ("Bksp", "Undo"),
            ("X", "Remove"),
            ("Tab", "Submit"),
            ("Esc", "Abandon"),
        ],
    );
}

fn render_countdown(f: &mut Frame, area: Rect, view: &AssessmentView<'_>) {
    let remaining = if view.timeout_secs == 0 {
        0.0
    } else {
        f64::from(view.time_remaining_secs) / f64::from(view.timeout_secs)
    };

    let title = if view.show_timeout_warning {
        Span::styled(" Time's up! Previous answer recorded ", MedicalTheme::danger())
    } else {
        Span::styled(" Time remaining ", MedicalTheme::text_secondary())
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::countdown(remaining))
        .ratio(remaining.clamp(0.0, 1.0))
        .label(format!("{}s", view.time_remaining_secs));
    f.render_widget(gauge, area);
}

fn render_lights(f: &mut Frame, area: Rect, question: &Question) {
    let block = Block::default()
        .title(Span::styled(" Identify the lights, left to right ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lights: Vec<Span> = question
        .stimuli
        .iter()
        .flat_map(|hex| {
            [
                Span::styled("  ████  ", Style::default().fg(MedicalTheme::stimulus(hex))),
                Span::raw("   "),
            ]
        })
        .collect();

    let row = Line::from(lights);
    let paragraph = Paragraph::new(vec![Line::from(""), row.clone(), row])
        .alignment(Alignment::Center);
    f.render_widget(paragraph, inner);
}

fn render_selection(f: &mut Frame, area: Rect, view: &AssessmentView<'_>) {
    let mut spans = vec![Span::styled("Your answer: ", MedicalTheme::text_secondary())];

    if view.pending.is_empty() {
        spans.push(Span::styled("(nothing selected)", MedicalTheme::text_muted()));
    } else {
        for (i, token) in view.pending.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" → ", MedicalTheme::text_muted()));
            }
            spans.push(Span::styled(token.to_string(), MedicalTheme::token(token)));
        }
    }

    spans.push(Span::styled(
        format!("   ({}/{})", view.pending.len(), view.question.answer_len()),
        MedicalTheme::text_muted(),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(paragraph, area);
}

fn render_palette(f: &mut Frame, area: Rect, view: &AssessmentView<'_>) {
    let spans: Vec<Span> = view
        .palette
        .iter()
        .enumerate()
        .flat_map(|(i, token)| {
            let style = if i == view.cursor {
                MedicalTheme::selected()
            } else if view.pending.contains(token) {
                MedicalTheme::used()
            } else {
                MedicalTheme::token(token)
            };
            [
                Span::styled(format!(" {} {} ", i + 1, token), style),
                Span::raw("  "),
            ]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(Span::styled(" Palette ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
    f.render_widget(paragraph, area);
}
