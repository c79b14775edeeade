//! trawl: interactive CLI/TUI client for remote log search and analysis.
//!
//! trawl drives a remote log indexer through a navigable command tree that
//! works two ways:
//!
//! - **One-shot CLI**: every leaf is a scriptable subcommand
//!   (`trawl query ...`, `trawl macros list`, ...)
//! - **Interactive shell**: with no subcommand, a persistent prompt opens;
//!   directories are navigated like a filesystem and each leaf becomes an
//!   interactive sub-program
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`tree`]: the command tree, path walker, and action registry
//! - [`shell`]: the interactive session core (prompt loop, handoff)
//! - [`history`]: fixed-capacity command history
//! - [`browser`]: the tabbed result browser and its keep-alive heartbeat
//! - [`actions`]: leaf models (query submission, CRUD scaffolds)
//! - [`remote`]: blocking HTTP client for the indexer API
//! - [`cli`]: clap command-line surface
//! - [`tui`]: terminal plumbing (events, theme, widgets, draw loop)
//! - [`config`]: configuration management
//! - [`error`]: error types and exit codes
//!
//! # Quick start
//!
//! ```rust,no_run
//! use trawl::config::Config;
//! use trawl::remote::{RemoteClient, TimeRange};
//!
//! fn main() -> trawl::Result<()> {
//!     let config = Config::load()?;
//!     let client = RemoteClient::new(&config.remote)?;
//!
//!     let handle = client.submit_search(
//!         "tag=syslog error",
//!         TimeRange::last(chrono::Duration::hours(1)),
//!     )?;
//!     client.wait_for_search(&handle)?;
//!
//!     let results = client.fetch_text_results(&handle, 0, 100)?;
//!     for line in results.lines {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod actions;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod remote;
pub mod shell;
pub mod tree;
pub mod tui;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{Result, TrawlError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {

    pub use crate::error::{Result, TrawlError};
    pub use crate::remote::{RemoteClient, SearchHandle, SearchResults, TimeRange};
    pub use crate::shell::action::{Action, ArgOutcome, Effect, SessionContext};
    pub use crate::shell::{Shell, ShellState};
}
