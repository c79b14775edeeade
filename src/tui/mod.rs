//! Terminal plumbing for the interactive shell.
//!
//! Provides:
//! - the event pump (tick + key + resize over a channel)
//! - the terminal lifecycle and top-level draw loop
//! - the color theme and small reusable widgets
//!
//! Built with ratatui for cross-platform terminal support.

pub mod app;
pub mod components;
pub mod events;
pub mod theme;

pub use app::run;
