//! Theme and styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::models::QuestionKind;

/// Color palette for a theme.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Brand Colors
    pub primary: Color,
    pub accent: Color,

    // Feedback Colors
    pub correct: Color,
    pub wrong: Color,
    pub notice: Color,

    // Background Colors
    pub bg_dark: Color,
    pub bg_highlight: Color,

    // Text Colors
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,

    // Quiz Colors
    pub star: Color,
    pub star_empty: Color,
    pub listen: Color,
    pub picture: Color,
}

/// Available theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Sunny,
    Chalkboard,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Sunny => "sunny",
            ThemeName::Chalkboard => "chalkboard",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeName::Sunny => "Sunny",
            ThemeName::Chalkboard => "Chalkboard",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "chalkboard" | "chalk" | "dark" => ThemeName::Chalkboard,
            _ => ThemeName::Sunny,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeName::Sunny => ThemeName::Chalkboard,
            ThemeName::Chalkboard => ThemeName::Sunny,
        }
    }
}

/// Theme struct that holds colors and provides style methods.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub colors: ThemeColors,
}

impl Theme {
    pub fn new(name: ThemeName) -> Self {
        let colors = match name {
            ThemeName::Sunny => Self::sunny_colors(),
            ThemeName::Chalkboard => Self::chalkboard_colors(),
        };
        Self { name, colors }
    }

    pub fn from_name(name: &str) -> Self {
        Self::new(ThemeName::from_str(name))
    }

    /// Bright classroom palette on a deep blue background.
    fn sunny_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(59, 130, 246),      // Blue 500
            accent: Color::Rgb(249, 115, 22),       // Orange 500

            correct: Color::Rgb(34, 197, 94),       // Green 500
            wrong: Color::Rgb(239, 68, 68),         // Red 500
            notice: Color::Rgb(250, 204, 21),       // Yellow 400

            bg_dark: Color::Rgb(23, 37, 84),        // Blue 950
            bg_highlight: Color::Rgb(30, 64, 175),  // Blue 800

            text: Color::Rgb(248, 250, 252),        // Slate 50
            text_muted: Color::Rgb(191, 219, 254),  // Blue 200
            text_dim: Color::Rgb(96, 165, 250),     // Blue 400

            star: Color::Rgb(250, 204, 21),         // Yellow 400
            star_empty: Color::Rgb(71, 85, 105),    // Slate 600
            listen: Color::Rgb(45, 212, 191),       // Teal 400
            picture: Color::Rgb(244, 114, 182),     // Pink 400
        }
    }

    /// Muted green board with chalk-white text.
    fn chalkboard_colors() -> ThemeColors {
        ThemeColors {
            primary: Color::Rgb(0xA7, 0xD1, 0xAB),
            accent: Color::Rgb(0xF4, 0xD3, 0x5E),

            correct: Color::Rgb(0x9B, 0xE5, 0x64),
            wrong: Color::Rgb(0xF2, 0x6D, 0x6D),
            notice: Color::Rgb(0xF4, 0xD3, 0x5E),

            bg_dark: Color::Rgb(0x1E, 0x2D, 0x24),
            bg_highlight: Color::Rgb(0x2F, 0x4A, 0x3A),

            text: Color::Rgb(0xF1, 0xF1, 0xE6),
            text_muted: Color::Rgb(0xC9, 0xCF, 0xC0),
            text_dim: Color::Rgb(0x6B, 0x80, 0x72),

            star: Color::Rgb(0xF4, 0xD3, 0x5E),
            star_empty: Color::Rgb(0x4A, 0x5D, 0x50),
            listen: Color::Rgb(0x8E, 0xC5, 0xE8),
            picture: Color::Rgb(0xE8, 0xA8, 0xC8),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Styles
    // ══════════════════════════════════════════════════════════════════════

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.colors.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.colors.bg_highlight)
            .fg(self.colors.text)
    }

    pub fn word(&self) -> Style {
        Style::default()
            .fg(self.colors.text)
            .add_modifier(Modifier::BOLD)
    }

    pub fn meaning(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn correct(&self) -> Style {
        Style::default()
            .fg(self.colors.correct)
            .add_modifier(Modifier::BOLD)
    }

    pub fn wrong(&self) -> Style {
        Style::default()
            .fg(self.colors.wrong)
            .add_modifier(Modifier::BOLD)
    }

    pub fn star(&self, lit: bool) -> Style {
        if lit {
            Style::default().fg(self.colors.star)
        } else {
            Style::default().fg(self.colors.star_empty)
        }
    }

    pub fn question_kind(&self, kind: QuestionKind) -> Style {
        let color = match kind {
            QuestionKind::ListenAndChoose => self.colors.listen,
            QuestionKind::WordPictureMatch => self.colors.picture,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.colors.text_dim)
    }

    pub fn key_highlight(&self) -> Style {
        Style::default()
            .fg(self.colors.accent)
            .add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeName::Sunny)
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Icons
// ══════════════════════════════════════════════════════════════════════════

pub mod icons {
    pub const CHECK: &str = "✓";
    pub const CROSS: &str = "✗";
    pub const STAR: &str = "★";
    pub const STAR_EMPTY: &str = "☆";
    pub const SPEAKER: &str = "🔊";
    pub const BOOK: &str = "📚";
}
