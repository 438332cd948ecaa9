//! Resolved terminal colors for the dark and light themes.

use crate::config::{Palette, ThemeConfig};
use crate::state::Theme;
use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

/// A palette parsed into terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub selection: Color,
}

impl Colors {
    /// Parse a palette. Unparseable entries fall back to the terminal default.
    pub fn from_palette(palette: &Palette) -> Self {
        Self {
            primary: parse(&palette.primary),
            accent: parse(&palette.accent),
            success: parse(&palette.success),
            warning: parse(&palette.warning),
            error: parse(&palette.error),
            background: parse(&palette.background),
            foreground: parse(&palette.foreground),
            muted: parse(&palette.muted),
            border: parse(&palette.border),
            selection: parse(&palette.selection),
        }
    }

    /// Base style for panels.
    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

/// Colors for both themes, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    dark: Colors,
    light: Colors,
}

impl ThemeColors {
    pub fn new(config: &ThemeConfig) -> Self {
        Self {
            dark: Colors::from_palette(&config.dark),
            light: Colors::from_palette(&config.light),
        }
    }

    pub fn get(&self, theme: Theme) -> &Colors {
        match theme {
            Theme::Dark => &self.dark,
            Theme::Light => &self.light,
        }
    }
}

fn parse(value: &str) -> Color {
    Color::from_str(value).unwrap_or_else(|_| {
        tracing::debug!("Ignoring invalid color {:?}", value);
        Color::Reset
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors_parse() {
        let colors = Colors::from_palette(&Palette::default());
        assert_eq!(colors.error, Color::Rgb(0xef, 0x53, 0x50));
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let palette = Palette {
            primary: "not-a-color".to_string(),
            ..Palette::default()
        };
        assert_eq!(Colors::from_palette(&palette).primary, Color::Reset);
    }

    #[test]
    fn test_theme_selects_palette() {
        let colors = ThemeColors::new(&ThemeConfig::default());
        assert_ne!(colors.get(Theme::Dark), colors.get(Theme::Light));
    }
}
