//! Error types for trawl.
//!
//! This module provides comprehensive error handling following the thiserror
//! pattern. Error types are designed to be informative, actionable, and
//! suitable for both programmatic handling and user-facing display.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for trawl operations.
#[derive(Error, Debug)]
pub enum TrawlError {
    /// Remote API request failed.
    #[error("Remote request failed: {context}")]
    RemoteError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying transport error, if available.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The remote reported an unexpected HTTP status.
    #[error("Remote returned {status} for {context}")]
    RemoteStatus {
        /// HTTP status code.
        status: u16,
        /// Context describing the operation.
        context: String,
    },

    /// The remote has no item with the requested identifier.
    ///
    /// Distinguished from [`TrawlError::RemoteStatus`] so callers can show
    /// "no item with that ID" instead of a generic error dump.
    #[error("No {kind} with ID {id}")]
    NotFound {
        /// Entity kind ("macro", "kit", "search", ...).
        kind: String,
        /// The identifier that was not found.
        id: String,
    },

    /// Search submission or execution failed.
    #[error("Search failed: {message}")]
    SearchError {
        /// Human-readable error message.
        message: String,
    },

    /// No remote endpoint is configured.
    #[error("No remote configured (set remote.url in the config file or pass --remote-url)")]
    NoRemote,

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// Operation interrupted.
    #[error("Operation interrupted")]
    Interrupted,
}

impl TrawlError {
    /// Create a new remote error with context.
    #[must_use]
    pub fn remote(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::RemoteError {
            context: context.into(),
            source: Some(source),
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new search error.
    #[must_use]
    pub fn search(message: impl Into<String>) -> Self {
        Self::SearchError {
            message: message.into(),
        }
    }

    /// Create a new not-found error.
    #[must_use]
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create a new invalid-argument error.
    #[must_use]
    pub fn invalid_arg(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::FileNotFound { .. } => 3,
            Self::ConfigError { .. } | Self::NoRemote => 5,
            Self::RemoteError { .. } | Self::RemoteStatus { .. } | Self::SearchError { .. } => 7,
            Self::InvalidArgument { .. } => 64,
            Self::IoError { .. } => 74,
            Self::Interrupted => 130,
            _ => 1,
        }
    }

    /// Check whether this error should be surfaced inline (in a prompt or
    /// tab error slot) rather than terminating the session.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Interrupted)
    }
}

/// Result type alias for trawl operations.
pub type Result<T> = std::result::Result<T, TrawlError>;

impl From<std::io::Error> for TrawlError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for TrawlError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// Specified entity or file not found.
    pub const EXIT_NOT_FOUND: i32 = 3;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Remote/search operation failed.
    pub const EXIT_REMOTE_ERROR: i32 = 7;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
    /// Terminated by Ctrl+C (128 + SIGINT).
    pub const EXIT_INTERRUPTED: i32 = 130;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let not_found = TrawlError::not_found("macro", "42");
        assert_eq!(not_found.exit_code(), 3);

        let search = TrawlError::search("parse failure");
        assert_eq!(search.exit_code(), 7);

        let usage = TrawlError::invalid_arg("cron", "too many fields");
        assert_eq!(usage.exit_code(), 64);

        assert_eq!(TrawlError::Interrupted.exit_code(), 130);
    }

    #[test]
    fn test_not_found_display() {
        let err = TrawlError::not_found("kit", "abc123");
        assert_eq!(err.to_string(), "No kit with ID abc123");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(TrawlError::search("x").is_recoverable());
        assert!(!TrawlError::Interrupted.is_recoverable());
    }
}
