//! Shell theming and colors.

use ratatui::style::{Color, Modifier, Style};

/// Application theme.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Name of the theme.
    pub name: String,
    /// Default foreground.
    pub foreground: Color,
    /// Primary accent (prompt, focused borders, active tab).
    pub primary: Color,
    /// Border color (unfocused).
    pub border: Color,
    /// Selection/stripe highlight.
    pub selection: Color,
    /// Error color.
    pub error: Color,
    /// Dimmed metadata (timestamps, footers).
    pub dim: Color,
    /// Success color.
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create the default dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            foreground: Color::White,
            primary: Color::Cyan,
            border: Color::DarkGray,
            selection: Color::DarkGray,
            error: Color::Red,
            dim: Color::DarkGray,
            success: Color::Green,
        }
    }

    /// Create a light theme.
    #[must_use]
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            foreground: Color::Black,
            primary: Color::Blue,
            border: Color::Gray,
            selection: Color::LightBlue,
            error: Color::Red,
            dim: Color::Gray,
            success: Color::Green,
        }
    }

    /// Get a theme by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Style for the prompt marker and active tab.
    #[must_use]
    pub fn primary_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for unfocused borders.
    #[must_use]
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for alternating result rows.
    #[must_use]
    pub fn stripe_style(&self) -> Style {
        Style::default().bg(self.selection)
    }

    /// Style for inline errors.
    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    /// Style for dimmed metadata.
    #[must_use]
    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }
}
