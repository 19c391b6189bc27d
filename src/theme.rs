//! Theme colors, with optional hex overrides from the config file

use ratatui::style::Color;

use crate::config::ThemeConfig;
use crate::selection::{Highlight, PALETTE};

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,           // Active borders, key hints, group headers
    pub danger: Color,           // Load failures
    pub text: Color,             // Primary text (foreground)
    pub text_dim: Color,         // Codes, hints, empty-state text
    pub bg_cursor: Color,        // Cursor row background
    pub inactive: Color,         // Inactive borders
    pub selected_fg: Color,      // Text drawn on top of a highlight color
    pub palette: [Color; 4],     // Selection highlight, indexed by Highlight
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_cursor: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            selected_fg: Color::Rgb(30, 30, 46),
            palette: [
                Color::Rgb(173, 216, 230), // lightblue
                Color::Rgb(144, 238, 144), // lightgreen
                Color::Rgb(255, 182, 193), // lightpink
                Color::Rgb(255, 255, 224), // lightyellow
            ],
        }
    }
}

impl Theme {
    /// Defaults with any valid overrides from the config applied
    pub fn from_config(config: &ThemeConfig) -> Self {
        let mut theme = Self::default();

        let overrides = [
            (&config.accent, &mut theme.accent),
            (&config.text, &mut theme.text),
            (&config.text_dim, &mut theme.text_dim),
            (&config.danger, &mut theme.danger),
        ];
        for (value, slot) in overrides {
            if let Some(value) = value {
                match Self::parse_hex_color(value) {
                    Some(color) => *slot = color,
                    None => tracing::warn!("Ignoring invalid theme color '{}'", value),
                }
            }
        }

        for (slot, value) in theme.palette.iter_mut().zip(&config.palette) {
            match Self::parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid palette color '{}'", value),
            }
        }

        theme
    }

    pub fn highlight(&self, highlight: Highlight) -> Color {
        let index = PALETTE.iter().position(|h| *h == highlight).unwrap_or(0);
        self.palette[index]
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');
        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Theme::parse_hex_color("#ffc107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(Theme::parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(Theme::parse_hex_color("#12345"), None);
        assert_eq!(Theme::parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_overrides_apply_and_invalid_values_are_skipped() {
        let config = ThemeConfig {
            accent: Some("#000000".to_string()),
            danger: Some("red".to_string()),
            palette: vec!["#111".to_string(), "nope".to_string()],
            ..Default::default()
        };
        let theme = Theme::from_config(&config);
        let defaults = Theme::default();

        assert_eq!(theme.accent, Color::Rgb(0, 0, 0));
        assert_eq!(theme.danger, defaults.danger);
        assert_eq!(theme.palette[0], Color::Rgb(17, 17, 17));
        assert_eq!(theme.palette[1], defaults.palette[1]);
        assert_eq!(theme.palette[3], defaults.palette[3]);
    }

    #[test]
    fn test_highlight_follows_palette_order() {
        let theme = Theme::default();
        assert_eq!(theme.highlight(Highlight::LightBlue), theme.palette[0]);
        assert_eq!(theme.highlight(Highlight::LightYellow), theme.palette[3]);
    }
}
