//! UI module: View components for the TUI.

pub mod assessment;
pub mod intro;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This screening is indicative only and does not replace a professional eye examination.",
            MedicalTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Screen calibration and ambient lighting affect results.",
            MedicalTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Shared single-line header: logo, title, context.
pub fn render_header(f: &mut Frame, area: Rect, title: &str, context: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {LOGO_SMALL} "), MedicalTheme::subtitle()),
        Span::styled(title.to_string(), MedicalTheme::title()),
        Span::styled(format!(" │ {context}"), MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Footer line built from `(key, description)` pairs.
pub fn render_key_hints(f: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!("[{key}] "), MedicalTheme::key_hint()),
                Span::styled(format!("{desc}  "), MedicalTheme::key_desc()),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
