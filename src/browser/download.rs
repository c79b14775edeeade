//! Download tab: write browsed results to a local file.
//!
//! Offers either a whole-file rendering fetched from the server (json,
//! csv, raw) or, when a record filter is given, a local write of just the
//! listed records from the in-memory result set. Submission is always
//! Alt+Enter; plain Enter never writes a file.

use std::io::Write;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;

use crate::error::Result;
use crate::remote::{DownloadFormat, SearchApi, SearchHandle};
use crate::tui::components::field_line;
use crate::tui::theme::Theme;
use crate::util::open_output;

/// Cursor-selectable fields, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Path,
    Append,
    FormatJson,
    FormatCsv,
    FormatRaw,
    Filter,
}

const FIELDS: [Field; 6] = [
    Field::Path,
    Field::Append,
    Field::FormatJson,
    Field::FormatCsv,
    Field::FormatRaw,
    Field::Filter,
];

/// State for the download tab.
#[derive(Debug)]
pub struct DownloadTab {
    /// Output file path.
    pub path: String,
    /// Append to the output file instead of truncating it.
    pub append: bool,
    /// Whole-file rendering. Exactly one format is selected at all times.
    pub format: DownloadFormat,
    /// Optional comma-separated list of 1-based record indices.
    pub filter: String,
    focus: usize,
    /// Field-level error, shown next to the affected field.
    pub error: Option<String>,
    /// Success note from the last write.
    pub status: Option<String>,
}

impl Default for DownloadTab {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadTab {
    /// Fresh tab state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            path: String::new(),
            append: false,
            format: DownloadFormat::Json,
            filter: String::new(),
            focus: 0,
            error: None,
            status: None,
        }
    }

    fn has_filter(&self) -> bool {
        !self.filter.trim().is_empty()
    }

    /// Whether a field is reachable by the cursor right now. Whole-file
    /// format options are skipped while a record filter is present.
    fn selectable(&self, field: Field) -> bool {
        match field {
            Field::FormatJson | Field::FormatCsv | Field::FormatRaw => !self.has_filter(),
            _ => true,
        }
    }

    fn move_focus(&mut self, delta: isize) {
        let len = FIELDS.len() as isize;
        let mut idx = self.focus as isize;
        for _ in 0..len {
            idx = (idx + delta).rem_euclid(len);
            if self.selectable(FIELDS[idx as usize]) {
                self.focus = idx as usize;
                return;
            }
        }
    }

    fn fix_focus(&mut self) {
        if !self.selectable(FIELDS[self.focus]) {
            self.move_focus(1);
        }
    }

    /// Handle a keystroke. Returns `true` when submission was requested.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        // Stale errors don't linger once the user starts correcting.
        self.error = None;
        self.status = None;

        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => return true,
            KeyCode::Up => self.move_focus(-1),
            KeyCode::Down => self.move_focus(1),
            KeyCode::Backspace => match FIELDS[self.focus] {
                Field::Path => {
                    self.path.pop();
                }
                Field::Filter => {
                    self.filter.pop();
                    self.fix_focus();
                }
                _ => {}
            },
            KeyCode::Char(' ') => match FIELDS[self.focus] {
                Field::Append => self.append = !self.append,
                Field::FormatJson => self.format = DownloadFormat::Json,
                Field::FormatCsv => self.format = DownloadFormat::Csv,
                Field::FormatRaw => self.format = DownloadFormat::Raw,
                Field::Path => self.path.push(' '),
                Field::Filter => {}
            },
            KeyCode::Char(c) => match FIELDS[self.focus] {
                Field::Path => self.path.push(c),
                Field::Filter => {
                    self.filter.push(c);
                    self.fix_focus();
                }
                _ => {}
            },
            _ => {}
        }
        false
    }

    /// Perform the write. Whole-file renderings are delegated to the
    /// server; a record filter is written locally from `data`.
    pub fn submit(&mut self, data: &[String], handle: &SearchHandle, api: &dyn SearchApi) {
        if self.path.trim().is_empty() {
            self.error = Some("output path is required".to_string());
            return;
        }

        if self.has_filter() {
            let indices = match parse_record_filter(&self.filter, data.len()) {
                Ok(indices) => indices,
                Err(reason) => {
                    self.error = Some(reason);
                    return;
                }
            };
            match self.write_records(data, &indices) {
                Ok(()) => {
                    self.status =
                        Some(format!("wrote {} records to {}", indices.len(), self.path));
                }
                Err(err) => self.error = Some(err.to_string()),
            }
            return;
        }

        match self.download_whole(handle, api) {
            Ok(bytes) => self.status = Some(format!("wrote {bytes} bytes to {}", self.path)),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    fn write_records(&self, data: &[String], indices: &[usize]) -> Result<()> {
        // The first open truncates or appends per the flag; every record
        // after that appends within the same handle.
        let mut file = open_output(&self.path, self.append)?;
        for &idx in indices {
            writeln!(file, "{}", data[idx])
                .map_err(|e| crate::error::TrawlError::io("writing record", e))?;
        }
        Ok(())
    }

    fn download_whole(&self, handle: &SearchHandle, api: &dyn SearchApi) -> Result<u64> {
        let mut file = open_output(&self.path, self.append)?;
        api.download_search(&handle.id, self.format, &mut file)
    }

    /// Render the tab body.
    #[must_use]
    pub fn view(&self, theme: &Theme) -> Vec<Line<'static>> {
        let focused = FIELDS[self.focus];
        let radio = |format: DownloadFormat| {
            if self.format == format {
                "(x)"
            } else {
                "( )"
            }
        };
        let formats_na = self.has_filter();
        let format_value = |format: DownloadFormat| {
            if formats_na {
                format!("{} (whole-file only)", radio(format))
            } else {
                radio(format).to_string()
            }
        };

        let mut lines = vec![
            Line::from("Write results to a file (alt+enter to submit)"),
            Line::from(""),
            field_line(
                "output path",
                &self.path,
                focused == Field::Path,
                self.error.as_deref().filter(|_| focused == Field::Path),
                theme,
            ),
            field_line(
                "append",
                if self.append { "[x]" } else { "[ ]" },
                focused == Field::Append,
                None,
                theme,
            ),
            field_line(
                "json",
                &format_value(DownloadFormat::Json),
                focused == Field::FormatJson,
                None,
                theme,
            ),
            field_line(
                "csv",
                &format_value(DownloadFormat::Csv),
                focused == Field::FormatCsv,
                None,
                theme,
            ),
            field_line(
                "raw",
                &format_value(DownloadFormat::Raw),
                focused == Field::FormatRaw,
                None,
                theme,
            ),
            field_line(
                "records (1-based, comma-separated)",
                &self.filter,
                focused == Field::Filter,
                self.error.as_deref().filter(|_| focused == Field::Filter),
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

/// Parse a comma-separated 1-based record list against a result set of
/// size `max`. Returns 0-based indices in the listed order.
///
/// Validation is all-or-nothing: a bad index rejects the whole list before
/// anything is written.
pub fn parse_record_filter(filter: &str, max: usize) -> std::result::Result<Vec<usize>, String> {
    let mut indices = Vec::new();
    for part in filter.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err("record list has an empty entry".to_string());
        }
        let n: usize = part
            .parse()
            .map_err(|_| format!("'{part}' is not a record number"))?;
        if n == 0 {
            return Err("record numbers start at 1".to_string());
        }
        if n > max {
            return Err(format!("record {n} is out of range (results hold {max})"));
        }
        indices.push(n - 1);
    }
    Ok(indices)
}
