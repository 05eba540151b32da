//! Theming system for Trilha

mod midnight;

pub use midnight::MIDNIGHT;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::lesson::model::Accent;

/// A color theme for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Card accents
    pub card_red: Color,
    pub card_green: Color,
    pub card_blue: Color,
    pub card_amber: Color,
    pub card_purple: Color,
    pub card_cyan: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub cursor: Color,
}

impl Theme {
    /// Color for a semantic card accent
    pub fn accent(&self, accent: Accent) -> Color {
        match accent {
            Accent::Neutral => self.fg_secondary,
            Accent::Red => self.card_red,
            Accent::Green => self.card_green,
            Accent::Blue => self.card_blue,
            Accent::Amber => self.card_amber,
            Accent::Purple => self.card_purple,
            Accent::Cyan => self.card_cyan,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::midnight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_midnight() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Midnight");
    }

    #[test]
    fn every_accent_maps_to_a_color() {
        let theme = Theme::default();
        for accent in [
            Accent::Neutral,
            Accent::Red,
            Accent::Green,
            Accent::Blue,
            Accent::Amber,
            Accent::Purple,
            Accent::Cyan,
        ] {
            assert!(matches!(theme.accent(accent), Color::Rgb(_, _, _)));
        }
    }
}
