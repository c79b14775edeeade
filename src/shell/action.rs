//! The contract leaf commands implement to take over the interactive loop.

use std::sync::Arc;

use ratatui::text::Text;

use crate::browser::keepalive::SearchLiveness;
use crate::config::Config;
use crate::error::Result;
use crate::remote::{RemoteClient, SearchApi};
use crate::tui::events::Event;
use crate::tui::theme::Theme;

/// Declarative instruction to the rendering host. A model never performs
/// terminal I/O itself.
#[derive(Debug)]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Print a line to the shell scrollback.
    Print(String),
    /// Terminate the session.
    Quit,
    /// Apply several effects in order.
    Many(Vec<Effect>),
}

impl Effect {
    /// Collapse a batch, dropping no-ops.
    #[must_use]
    pub fn batch(effects: Vec<Effect>) -> Self {
        let mut kept: Vec<Effect> = effects
            .into_iter()
            .filter(|e| !matches!(e, Self::None))
            .collect();
        match kept.len() {
            0 => Self::None,
            1 => kept.remove(0),
            _ => Self::Many(kept),
        }
    }
}

/// Outcome of handing arguments to a model.
#[derive(Debug)]
pub struct ArgOutcome {
    /// Why the arguments were rejected. A rejection is printed at the
    /// prompt and prevents handoff.
    pub invalid: Option<String>,
    /// Effects to apply once handoff begins.
    pub startup: Effect,
}

impl ArgOutcome {
    /// Arguments accepted, nothing to emit.
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            invalid: None,
            startup: Effect::None,
        }
    }

    /// Arguments accepted, with startup effects.
    #[must_use]
    pub fn with_startup(startup: Effect) -> Self {
        Self {
            invalid: None,
            startup,
        }
    }

    /// Arguments rejected for the given reason.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            invalid: Some(reason.into()),
            startup: Effect::None,
        }
    }
}

/// Shared session services handed to every model at dispatch time.
#[derive(Clone)]
pub struct SessionContext {
    /// Remote API client.
    pub client: Arc<RemoteClient>,
    /// Loaded configuration.
    pub config: Config,
    /// Liveness oracle for the active search (see
    /// [`crate::browser::keepalive`]).
    pub liveness: Arc<SearchLiveness>,
    /// Terminal size `(cols, rows)` at dispatch time.
    pub term_size: (u16, u16),
}

impl SessionContext {
    /// The client as the browser-facing API slice.
    #[must_use]
    pub fn api(&self) -> Arc<dyn SearchApi> {
        self.client.clone()
    }
}

/// An interactive model bolted onto an Action node.
///
/// Lifecycle: instantiated once at tree-assembly time and reused across
/// invocations. After `done()` reports true the shell calls `reset()`,
/// which must clear per-invocation state (focus, buffers, results) but not
/// static configuration.
pub trait Action: Send {
    /// Process one event while this model holds the session.
    fn update(&mut self, ev: &Event) -> Effect;

    /// Render the model's current view.
    fn view(&self, theme: &Theme) -> Text<'static>;

    /// Whether the model has finished and control should return to the
    /// prompt.
    fn done(&self) -> bool;

    /// Clear per-invocation state for the next use.
    fn reset(&mut self) -> Result<()>;

    /// Receive the session context and the tokens left over from path
    /// resolution. Called once per invocation, before handoff.
    fn set_args(&mut self, ctx: &SessionContext, tokens: &[String]) -> Result<ArgOutcome>;
}
