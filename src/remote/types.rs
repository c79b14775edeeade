//! Wire types for the remote indexer API.
//!
//! These mirror a thin JSON contract; unknown fields are ignored on the
//! way in so minor server additions don't break the client.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Absolute time window a search runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Window start (inclusive).
    pub start: DateTime<Utc>,
    /// Window end (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// A window ending now and reaching `span` into the past.
    #[must_use]
    pub fn last(span: Duration) -> Self {
        let end = Utc::now();
        Self {
            start: end - span,
            end,
        }
    }

    /// Window length in whole seconds, never negative.
    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        (self.end - self.start).num_seconds().max(0) as u64
    }
}

/// A submitted search, as the client tracks it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHandle {
    /// Server-assigned search identifier.
    pub id: String,
    /// The submitted query string.
    pub query: String,
    /// The time window the search covers.
    pub range: TimeRange,
}

/// Server-side lifecycle of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchState {
    /// Queued, not yet running.
    Pending,
    /// Executing.
    Running,
    /// Finished successfully; results are available.
    Complete,
    /// Finished with an error.
    Failed,
}

/// Status report for a submitted search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchStatus {
    /// Search identifier.
    pub id: String,
    /// Current lifecycle state.
    pub state: SearchState,
    /// Error detail when `state` is `Failed`.
    #[serde(default)]
    pub error: Option<String>,
}

/// A page of rendered result lines.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    /// Rendered text lines for the requested window.
    pub lines: Vec<String>,
    /// Total result count on the server.
    pub total: u64,
}

/// Whole-file download renderings offered by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    /// One JSON object per result.
    Json,
    /// Comma-separated values.
    Csv,
    /// Raw result text.
    Raw,
}

impl DownloadFormat {
    /// The wire name of the format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Raw => "raw",
        }
    }
}

/// A saved query expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Macro {
    /// Server-assigned identifier.
    pub id: String,
    /// Invocation name.
    pub name: String,
    /// Replacement text.
    pub expansion: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Request body for creating a macro.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMacro {
    /// Invocation name.
    pub name: String,
    /// Replacement text.
    pub expansion: String,
    /// Free-form description.
    pub description: String,
}

/// An installed content kit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kit {
    /// Server-assigned identifier.
    pub id: String,
    /// Kit name.
    pub name: String,
    /// Kit version.
    pub version: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// A saved dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    /// Server-assigned identifier.
    pub id: String,
    /// Dashboard name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// A field extractor definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extractor {
    /// Server-assigned identifier.
    pub id: String,
    /// Extractor name.
    pub name: String,
    /// Tag the extractor applies to.
    pub tag: String,
    /// Extraction expression.
    pub expression: String,
}

/// Request body for creating an extractor.
#[derive(Debug, Clone, Serialize)]
pub struct CreateExtractor {
    /// Extractor name.
    pub name: String,
    /// Tag the extractor applies to.
    pub tag: String,
    /// Extraction expression.
    pub expression: String,
}

/// A recurring search registered on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledSearch {
    /// Server-assigned identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Cron expression controlling the schedule.
    pub cron: String,
    /// The query to run.
    pub query: String,
    /// How far back each run searches, in seconds.
    pub duration_secs: u64,
}

/// Request body for creating a scheduled search.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleRequest {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Cron expression controlling the schedule.
    pub cron: String,
    /// The query to run.
    pub query: String,
    /// How far back each run searches, in seconds.
    pub duration_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_duration() {
        let range = TimeRange::last(Duration::minutes(90));
        assert_eq!(range.duration_secs(), 90 * 60);
    }

    #[test]
    fn test_search_state_parses() {
        let status: SearchStatus =
            serde_json::from_str(r#"{"id":"s1","state":"complete"}"#).unwrap();
        assert_eq!(status.state, SearchState::Complete);
        assert!(status.error.is_none());
    }

    #[test]
    fn test_download_format_names() {
        assert_eq!(DownloadFormat::Json.as_str(), "json");
        assert_eq!(DownloadFormat::Csv.as_str(), "csv");
        assert_eq!(DownloadFormat::Raw.as_str(), "raw");
    }
}
