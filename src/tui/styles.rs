//! Clinical color palette and styles.
//!
//! UI chrome stays in muted slate and teal so the stimulus lights are the
//! only saturated colors on screen.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{Diagnosis, Token};

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    // === Primary Colors ===

    /// Deep teal - Primary color (trust, medical)
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    // === Secondary Colors ===

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    // === Background / Text ===

    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A
    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for the palette entry under the cursor
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Palette entries already used in this question
    #[must_use]
    pub fn used() -> Style {
        Style::default()
            .fg(Self::TEXT_MUTED)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for a diagnosis bucket
    #[must_use]
    pub fn diagnosis(diagnosis: Diagnosis) -> Style {
        let (r, g, b) = diagnosis.color();
        Style::default().fg(Color::Rgb(r, g, b))
    }

    /// Countdown gauge style by remaining fraction (1.0 = full time left)
    #[must_use]
    pub fn countdown(remaining: f64) -> Style {
        if remaining > 0.5 {
            Self::success()
        } else if remaining > 0.2 {
            Self::warning()
        } else {
            Self::danger()
        }
    }

    /// Color a stimulus light from its `#RRGGBB` (or `#RGB`) value.
    ///
    /// Unparseable values render as white.
    #[must_use]
    pub fn stimulus(hex: &str) -> Color {
        parse_hex(hex).map_or(Color::White, |(r, g, b)| Color::Rgb(r, g, b))
    }

    /// Label color for an answer token.
    #[must_use]
    pub fn token(token: &Token) -> Style {
        let color = match token.as_str() {
            "red" => Color::Rgb(229, 57, 53),
            "green" => Color::Rgb(67, 160, 71),
            "blue" => Color::Rgb(30, 136, 229),
            "yellow" => Color::Rgb(253, 216, 53),
            _ => Self::TEXT_PRIMARY,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match digits.len() {
        6 => Some((
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
        )),
        3 => {
            let expand = |s: &str| channel(s).map(|v| v * 17);
            Some((
                expand(digits.get(0..1)?)?,
                expand(digits.get(1..2)?)?,
                expand(digits.get(2..3)?)?,
            ))
        }
        _ => None,
    }
}

/// Inline wordmark
pub const LOGO_SMALL: &str = "◉ Lantern";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#E53935"), Some((229, 57, 53)));
        assert_eq!(parse_hex("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex("E53935"), None);
        assert_eq!(parse_hex("#12"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_stimulus_fallback() {
        assert_eq!(MedicalTheme::stimulus("not-a-color"), Color::White);
        assert_eq!(MedicalTheme::stimulus("#000000"), Color::Rgb(0, 0, 0));
    }
}
