//! Reusable shell widgets.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::theme::Theme;

/// Spinner frames for in-flight operations.
pub const SPINNER_FRAMES: &[&str] = &["|", "/", "-", "\\"];

/// Pick a spinner frame for a tick counter.
#[must_use]
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Build a single-row tab bar line with the active tab highlighted.
#[must_use]
pub fn tab_line(titles: &[&str], active: usize, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, title) in titles.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", theme.dim_style()));
        }
        let style = if i == active {
            theme.primary_style()
        } else {
            theme.dim_style()
        };
        spans.push(Span::styled((*title).to_string(), style));
    }
    Line::from(spans)
}

/// A status/footer bar with left- and right-aligned text.
pub struct StatusBar<'a> {
    left: String,
    right: String,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Create a status bar.
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            theme,
        }
    }

    /// Render the status bar into `area`.
    pub fn render(self, f: &mut Frame, area: Rect) {
        let width = area.width as usize;
        let used = self.left.chars().count() + self.right.chars().count();
        let padding = " ".repeat(width.saturating_sub(used).max(1));

        let line = Line::from(vec![
            Span::raw(self.left),
            Span::raw(padding),
            Span::styled(self.right, self.theme.dim_style()),
        ]);

        f.render_widget(Paragraph::new(line), area);
    }
}

/// Render a cursor-selectable form field as a line.
///
/// The focused field gets a `>` marker and the primary style; an error on
/// the field is appended in the error style.
#[must_use]
pub fn field_line<'f>(
    label: &str,
    value: &str,
    focused: bool,
    error: Option<&str>,
    theme: &Theme,
) -> Line<'f> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        theme.primary_style()
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(marker.to_string()),
        Span::styled(format!("{label}: "), label_style),
        Span::raw(value.to_string()),
    ];
    if let Some(err) = error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(err.to_string(), theme.error_style()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(spinner_frame(0), "|");
        assert_eq!(spinner_frame(4), "|");
        assert_eq!(spinner_frame(5), "/");
    }

    #[test]
    fn test_tab_line_marks_active() {
        let theme = Theme::dark();
        let line = tab_line(&["a", "b"], 1, &theme);
        // titles plus one separator
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[2].content, "b");
        assert_eq!(line.spans[2].style, theme.primary_style());
    }
}
