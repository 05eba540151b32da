//! Midnight theme implementation

use ratatui::style::Color;

use super::Theme;

/// Midnight color palette
pub const MIDNIGHT: Theme = Theme {
    name: String::new(), // Will be set properly with const fn when stabilized

    // Background colors
    bg_primary: Color::Rgb(22, 24, 33),   // #161821
    bg_secondary: Color::Rgb(31, 34, 47), // #1f222f
    bg_tertiary: Color::Rgb(54, 59, 79),  // #363b4f

    // Foreground colors
    fg_primary: Color::Rgb(198, 200, 209),   // #c6c8d1
    fg_secondary: Color::Rgb(165, 172, 196), // #a5acc4
    fg_muted: Color::Rgb(107, 112, 137),     // #6b7089

    // Accent colors
    accent_primary: Color::Rgb(132, 160, 247),   // #84a0f7
    accent_secondary: Color::Rgb(173, 142, 239), // #ad8eef

    // Semantic colors
    success: Color::Rgb(148, 199, 124), // #94c77c
    warning: Color::Rgb(226, 183, 116), // #e2b774
    error: Color::Rgb(233, 120, 138),   // #e9788a
    info: Color::Rgb(120, 199, 230),    // #78c7e6

    // Card accents
    card_red: Color::Rgb(233, 120, 138),    // #e9788a
    card_green: Color::Rgb(148, 199, 124),  // #94c77c
    card_blue: Color::Rgb(132, 160, 247),   // #84a0f7
    card_amber: Color::Rgb(226, 183, 116),  // #e2b774
    card_purple: Color::Rgb(173, 142, 239), // #ad8eef
    card_cyan: Color::Rgb(120, 199, 230),   // #78c7e6

    // UI elements
    border: Color::Rgb(54, 59, 79),            // #363b4f
    border_focused: Color::Rgb(132, 160, 247), // #84a0f7
    selection: Color::Rgb(42, 47, 66),         // #2a2f42
    cursor: Color::Rgb(198, 200, 209),         // #c6c8d1
};

// Workaround for const String
impl Theme {
    pub fn midnight() -> Self {
        Theme { name: "Midnight".to_string(), ..MIDNIGHT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_has_correct_name() {
        let theme = Theme::midnight();
        assert_eq!(theme.name, "Midnight");
    }

    #[test]
    fn midnight_colors_are_rgb() {
        let theme = Theme::midnight();
        assert!(matches!(theme.bg_primary, Color::Rgb(_, _, _)));
        assert!(matches!(theme.accent_primary, Color::Rgb(_, _, _)));
    }
}
