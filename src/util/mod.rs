//! Utility functions for common operations.
//!
//! This module provides shared utilities used across the crate:
//! - Atomic file operations for config safety
//! - Output-file opening with the crate's create/truncate/append policy
//! - Small text helpers for display

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, TrawlError};

/// Atomically write content to a file.
///
/// Writes to a temporary file in the same directory, flushes it, then
/// atomically renames it over the target path. If any step fails, the
/// original file (if it exists) remains unchanged.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = path.parent().ok_or_else(|| TrawlError::IoError {
        context: format!("Cannot determine parent directory for: {}", path.display()),
        source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
    })?;

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            TrawlError::io(
                format!("Failed to create directory: {}", parent.display()),
                e,
            )
        })?;
    }

    // Temp file in the same directory ensures the rename stays on one filesystem.
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        TrawlError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        TrawlError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        TrawlError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        TrawlError::io(
            format!("Failed to atomically write file: {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}

/// Open an output file for a download or `--output` write.
///
/// The file is opened create + write-only, truncated unless `append` is
/// requested, with permission mode 0644 on unix.
pub fn open_output(path: impl AsRef<Path>, append: bool) -> Result<File> {
    let path = path.as_ref();
    let mut opts = OpenOptions::new();
    opts.write(true).create(true);
    if append {
        opts.append(true);
    } else {
        opts.truncate(true);
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o644);
    }

    opts.open(path)
        .map_err(|e| TrawlError::io(format!("Failed to open output file: {}", path.display()), e))
}

/// Truncate a string for single-line display, appending an ellipsis when
/// content was dropped.
#[must_use]
pub fn truncate_line(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

/// Format a unix-seconds duration like `2h30m` for status footers.
#[must_use]
pub fn format_duration_secs(secs: u64) -> String {
    humantime::format_duration(std::time::Duration::from_secs(secs)).to_string()
}
