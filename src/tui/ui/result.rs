//! Result view: diagnosis, accuracy and per-question breakdown.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::{render_header, render_key_hints};
use crate::domain::AssessmentResult;
use crate::tui::styles::MedicalTheme;

pub fn render_result(f: &mut Frame, area: Rect, result: &AssessmentResult) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(4), // Diagnosis
            Constraint::Length(3), // Accuracy
            Constraint::Min(4),    // Responses
            Constraint::Length(
                u16::try_from(result.recommendations.len()).unwrap_or(u16::MAX).saturating_add(2),
            ),
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(
        f,
        chunks[0],
        "Screening Result",
        &result.completed_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );

    let diagnosis_style = MedicalTheme::diagnosis(result.diagnosis);
    let diagnosis = Paragraph::new(vec![
        Line::from(Span::styled(
            result.diagnosis.label(),
            diagnosis_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{} of {} correct · {} timed out · avg {:.1}s",
                result.correct_answers,
                result.total_questions,
                result.timed_out_count(),
                result.average_response_time_ms() as f64 / 1000.0
            ),
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );
    f.render_widget(diagnosis, chunks[1]);

    let accuracy = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Accuracy ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(diagnosis_style)
        .ratio((result.accuracy_percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", result.accuracy_percent));
    f.render_widget(accuracy, chunks[2]);

    render_responses(f, chunks[3], result);

    let recommendations: Vec<Line> = result
        .recommendations
        .iter()
        .map(|r| Line::from(Span::styled(format!("• {r}"), MedicalTheme::text())))
        .collect();
    let recommendations = Paragraph::new(recommendations)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(" Recommendations ", MedicalTheme::subtitle()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        );
    f.render_widget(recommendations, chunks[4]);

    render_key_hints(
        f,
        chunks[5],
        &[("Enter", "Retake"), ("Esc", "Back"), ("Q", "Quit")],
    );
}

fn render_responses(f: &mut Frame, area: Rect, result: &AssessmentResult) {
    let header = Row::new(["#", "Your answer", "Expected", "Result", "Time"])
        .style(MedicalTheme::text_secondary().add_modifier(Modifier::BOLD));

    let rows = result.responses.iter().enumerate().map(|(i, r)| {
        let (verdict, style) = if r.is_correct {
            ("correct", MedicalTheme::success())
        } else if r.timed_out {
            ("timed out", MedicalTheme::warning())
        } else {
            ("incorrect", MedicalTheme::danger())
        };

        Row::new([
            Cell::from((i + 1).to_string()),
            if r.is_unanswered() {
                Cell::from("(no answer)").style(MedicalTheme::text_muted())
            } else {
                Cell::from(r.user_answer.clone())
            },
            Cell::from(r.correct_answer.clone()),
            Cell::from(verdict).style(style),
            Cell::from(format!("{:.1}s", r.response_time_ms as f64 / 1000.0)),
        ])
        .style(MedicalTheme::text())
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Length(10),
            Constraint::Length(7),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(Span::styled(" Responses ", MedicalTheme::text_secondary()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(table, area);
}
