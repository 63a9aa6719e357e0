//! Green lab-report palette and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::application::view::Hsl;
use crate::domain::RangeStatus;

/// Color palette shared by every view.
pub struct LabTheme;

impl LabTheme {
    // === Primary Colors ===

    /// Emerald - Primary accent
    pub const PRIMARY: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Light emerald for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(110, 231, 183); // #6EE7B7

    /// Muted green-gray for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(134, 168, 150); // #86A896

    // === Semantic Colors ===

    pub const SUCCESS: Color = Color::Rgb(34, 197, 94); // #22C55E
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E
    pub const INFO: Color = Color::Rgb(56, 189, 248); // #38BDF8

    // === Background / Text ===

    pub const BG_DARK: Color = Color::Rgb(6, 31, 23); // #061F17
    pub const TEXT_PRIMARY: Color = Color::Rgb(236, 253, 245); // #ECFDF5
    pub const TEXT_SECONDARY: Color = Color::Rgb(167, 243, 208); // #A7F3D0
    pub const TEXT_MUTED: Color = Color::Rgb(100, 140, 120); // #648C78

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

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for a factor pill
    #[must_use]
    pub fn pill() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
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
    pub fn cursor() -> Style {
        Style::default().fg(Self::PRIMARY_LIGHT)
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

    /// Value colour by position against the reference band.
    #[must_use]
    pub fn range_status(status: RangeStatus) -> Style {
        match status {
            RangeStatus::Normal => Self::success(),
            RangeStatus::Below => Self::info(),
            RangeStatus::Above => Self::danger(),
        }
    }

    /// Terminal colour for an HSL value.
    #[must_use]
    pub fn hsl(color: Hsl) -> Color {
        let (r, g, b) = color.to_rgb();
        Color::Rgb(r, g, b)
    }
}
