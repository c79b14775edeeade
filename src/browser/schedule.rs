//! Schedule tab: register the browsed search as a recurring one.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;

use crate::remote::{ScheduleRequest, SearchApi, SearchHandle};
use crate::tui::components::field_line;
use crate::tui::theme::Theme;

/// Cursor-selectable fields, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Cron,
    Name,
    Description,
}

const FIELDS: [Field; 3] = [Field::Cron, Field::Name, Field::Description];

/// State for the schedule tab.
#[derive(Debug, Default)]
pub struct ScheduleTab {
    /// Cron expression controlling the schedule.
    pub cron: String,
    /// Display name for the recurring search.
    pub name: String,
    /// Free-form description.
    pub description: String,
    focus: usize,
    /// Field-level error, shown next to the affected field.
    pub error: Option<String>,
    /// Success note from the last submission.
    pub status: Option<String>,
}

impl ScheduleTab {
    /// Fresh tab state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn focused_value(&mut self) -> &mut String {
        match FIELDS[self.focus] {
            Field::Cron => &mut self.cron,
            Field::Name => &mut self.name,
            Field::Description => &mut self.description,
        }
    }

    /// Handle a keystroke. Returns `true` when submission was requested.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        self.error = None;
        self.status = None;

        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => return true,
            KeyCode::Up => {
                self.focus = self.focus.checked_sub(1).unwrap_or(FIELDS.len() - 1);
            }
            KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELDS.len();
            }
            KeyCode::Backspace => {
                self.focused_value().pop();
            }
            KeyCode::Char(c) => {
                self.focused_value().push(c);
            }
            _ => {}
        }
        false
    }

    /// Register the recurring search with the remote.
    ///
    /// The run duration is derived from the origin search's time window.
    pub fn submit(&mut self, handle: &SearchHandle, api: &dyn SearchApi) {
        if let Err(reason) = validate_cron(&self.cron) {
            self.error = Some(reason);
            return;
        }
        if self.name.trim().is_empty() {
            self.error = Some("name is required".to_string());
            return;
        }
        if self.description.trim().is_empty() {
            self.error = Some("description is required".to_string());
            return;
        }

        let request = ScheduleRequest {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            cron: self.cron.trim().to_string(),
            query: handle.query.clone(),
            duration_secs: handle.range.duration_secs(),
        };

        match api.create_scheduled_search(&request) {
            Ok(scheduled) => {
                self.status = Some(format!("scheduled search created (ID {})", scheduled.id));
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Render the tab body.
    #[must_use]
    pub fn view(&self, theme: &Theme) -> Vec<Line<'static>> {
        let focused = FIELDS[self.focus];
        let mut lines = vec![
            Line::from("Run this search on a schedule (alt+enter to submit)"),
            Line::from(""),
            field_line(
                "cron expression",
                &self.cron,
                focused == Field::Cron,
                self.error.as_deref().filter(|_| focused == Field::Cron),
                theme,
            ),
            field_line("name", &self.name, focused == Field::Name, None, theme),
            field_line(
                "description",
                &self.description,
                focused == Field::Description,
                None,
                theme,
            ),
        ];

        if let Some(status) = &self.status {
            lines.push(Line::from(""));
            lines.push(Line::styled(status.clone(), theme.dim_style()));
        } else if let Some(error) = &self.error {
            lines.push(Line::from(""));
            lines.push(Line::styled(error.clone(), theme.error_style()));
        }
        lines
    }

    /// Clear per-invocation state for reuse.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Syntactic cron check: non-empty, at most 5 space-separated fields.
///
/// Semantic validation (field ranges, step syntax) is the server's job.
pub fn validate_cron(cron: &str) -> std::result::Result<(), String> {
    let fields = cron.split_whitespace().count();
    if fields == 0 {
        return Err("cron expression is required".to_string());
    }
    if fields > 5 {
        return Err(format!("cron expression has {fields} fields (at most 5)"));
    }
    Ok(())
}
