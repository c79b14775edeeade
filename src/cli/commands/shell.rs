//! Launch the interactive shell.

use std::sync::Arc;

use crate::actions::assemble;
use crate::browser::keepalive::SearchLiveness;
use crate::config::Config;
use crate::error::Result;
use crate::shell::action::SessionContext;
use crate::shell::Shell;
use crate::tui;

use super::client_from;

/// Build the session and hand it to the terminal loop.
pub fn run(config: Config) -> Result<()> {
    let client = client_from(&config)?;
    let ctx = SessionContext {
        client,
        config,
        liveness: Arc::new(SearchLiveness::new()),
        term_size: crossterm::terminal::size().unwrap_or((80, 24)),
    };

    let (tree, registry) = assemble();
    let shell = Shell::new(tree, registry, ctx);
    tui::run(shell)
}
