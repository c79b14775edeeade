//! The interactive session core.
//!
//! The shell owns the prompt: it reads lines, resolves them against the
//! command tree, navigates directories, runs builtins, and hands the
//! session over to a leaf's interactive model until that model reports
//! `done()`. Kill keys are intercepted before anything else, so a
//! misbehaving child can never block termination.

pub mod action;
mod builtins;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::text::{Line, Span, Text};
use tracing::warn;

use crate::history::HistoryRing;
use crate::tree::registry::{ActionRegistry, RegistryKey};
use crate::tree::walk::{walk, WalkStatus};
use crate::tree::{CommandTree, NodeId};
use crate::tui::events::Event;
use crate::tui::theme::Theme;

use action::{Effect, SessionContext};

/// Scrollback lines retained for display.
const SCROLLBACK_CAP: usize = 1000;

/// Session states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    /// Normal prompt, accepting a line.
    Prompting,
    /// An action's model has control.
    Handoff,
    /// Terminal state; the host loop should exit.
    Quitting,
}

/// The interactive session state machine.
pub struct Shell {
    tree: CommandTree,
    registry: ActionRegistry,
    ctx: SessionContext,
    history: HistoryRing,
    input: String,
    dir: NodeId,
    state: ShellState,
    active: Option<RegistryKey>,
    scrollback: Vec<String>,
    browsing_history: bool,
    farewell: Option<String>,
    theme: Theme,
    term_size: (u16, u16),
}

impl Shell {
    /// Build a shell over an assembled tree and registry.
    #[must_use]
    pub fn new(tree: CommandTree, registry: ActionRegistry, ctx: SessionContext) -> Self {
        let dir = tree.root();
        let theme = Theme::from_name(&ctx.config.display.theme).unwrap_or_default();
        Self {
            tree,
            registry,
            ctx,
            history: HistoryRing::new(),
            input: String::new(),
            dir,
            state: ShellState::Prompting,
            active: None,
            scrollback: Vec::new(),
            browsing_history: false,
            farewell: None,
            theme,
            term_size: (80, 24),
        }
    }

    /// The active color theme.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> ShellState {
        self.state
    }

    /// Current directory node.
    #[must_use]
    pub fn dir(&self) -> NodeId {
        self.dir
    }

    /// Slash path of the current directory, for the prompt.
    #[must_use]
    pub fn prompt_path(&self) -> String {
        self.tree.path_of(self.dir)
    }

    /// Farewell message to print once the terminal is restored.
    #[must_use]
    pub fn farewell(&self) -> Option<&str> {
        self.farewell.as_deref()
    }

    /// Scrollback contents, oldest first.
    #[must_use]
    pub fn scrollback(&self) -> &[String] {
        &self.scrollback
    }

    /// Process one event.
    pub fn handle_event(&mut self, ev: &Event) {
        if let Event::Resize(cols, rows) = ev {
            self.term_size = (*cols, *rows);
        }

        // Universal kill-key check, ahead of all other dispatch.
        if let Event::Key(key) = ev {
            let ctrl_c = key.code == KeyCode::Char('c')
                && key.modifiers.contains(KeyModifiers::CONTROL);
            let esc_at_prompt =
                key.code == KeyCode::Esc && self.state == ShellState::Prompting;
            if ctrl_c || esc_at_prompt {
                self.quit();
                return;
            }
        }

        match self.state {
            ShellState::Quitting => {}
            ShellState::Handoff => self.forward_to_active(ev),
            ShellState::Prompting => self.prompt_event(ev),
        }
    }

    fn quit(&mut self) {
        self.apply_effect(Effect::Many(vec![
            Effect::Print("goodbye".to_string()),
            Effect::Quit,
        ]));
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Print(line) => self.print(line),
            Effect::Quit => {
                self.farewell = Some("goodbye".to_string());
                self.state = ShellState::Quitting;
            }
            Effect::Many(effects) => {
                for e in effects {
                    self.apply_effect(e);
                }
            }
        }
    }

    fn print(&mut self, line: String) {
        for part in line.split('\n') {
            self.scrollback.push(part.to_string());
        }
        if self.scrollback.len() > SCROLLBACK_CAP {
            let excess = self.scrollback.len() - SCROLLBACK_CAP;
            self.scrollback.drain(..excess);
        }
    }

    // --- handoff ---

    fn forward_to_active(&mut self, ev: &Event) {
        let Some(key) = self.active.clone() else {
            // Inconsistent state; recover to the prompt.
            self.state = ShellState::Prompting;
            return;
        };
        let model = self
            .registry
            .get_mut(&key)
            .unwrap_or_else(|| panic!("active model '{}' vanished from the registry", key.name));

        let effect = model.update(ev);
        let finished = model.done();
        self.apply_effect(effect);

        if finished {
            self.finish_handoff(&key);
        }
    }

    fn finish_handoff(&mut self, key: &RegistryKey) {
        if let Some(model) = self.registry.get_mut(key) {
            if let Err(err) = model.reset() {
                warn!(%err, action = %key.name, "model reset failed");
            }
        }
        self.active = None;
        if self.state != ShellState::Quitting {
            self.state = ShellState::Prompting;
        }
    }

    // --- prompting ---

    fn prompt_event(&mut self, ev: &Event) {
        let Event::Key(key) = ev else {
            return;
        };
        match key.code {
            KeyCode::Enter => self.submit_line(),
            KeyCode::Up => self.history_back(),
            KeyCode::Down => self.history_forward(),
            KeyCode::Backspace => {
                self.input.pop();
                self.stop_history_scroll();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                // Typing breaks history-scroll mode.
                self.stop_history_scroll();
            }
            _ => {}
        }
    }

    fn history_back(&mut self) {
        // Only navigate when the input is idle: empty, or already showing
        // a history record.
        if !self.input.is_empty() && !self.browsing_history {
            return;
        }
        let record = self.history.get_record();
        if !record.is_empty() {
            self.input = record;
            self.browsing_history = true;
        }
    }

    fn history_forward(&mut self) {
        if self.browsing_history {
            self.input.clear();
            self.stop_history_scroll();
        }
    }

    fn stop_history_scroll(&mut self) {
        self.browsing_history = false;
        self.history.unset_fetch();
    }

    fn submit_line(&mut self) {
        let line = std::mem::take(&mut self.input);
        self.stop_history_scroll();
        self.history.insert(&line);

        let prompt = self.prompt_path();
        self.print(format!("{prompt}> {line}"));

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let result = walk(&self.tree, self.dir, &tokens);

        match result.status {
            WalkStatus::Nav => {
                if let Some(node) = result.node {
                    self.dir = node;
                }
            }
            WalkStatus::Builtin => {
                if let Some(builtin) = result.builtin {
                    self.run_builtin(builtin, &result.rest);
                }
            }
            WalkStatus::Action => self.dispatch_action(&result.node.expect("action node"), result.rest),
            WalkStatus::Invalid | WalkStatus::Error => {
                // Partial navigation persists even though the final token
                // failed.
                if let Some(node) = result.node {
                    self.dir = node;
                }
                if let Some(error) = result.error {
                    self.print(error);
                }
            }
        }
    }

    fn dispatch_action(&mut self, node: &NodeId, tokens: Vec<String>) {
        let key = RegistryKey::for_node(&self.tree, *node);
        let name = self.tree.node(*node).name.clone();
        // A claimed Action with no registered model means the tree was
        // assembled wrong. That must never reach a running session.
        assert!(
            self.registry.contains(&key),
            "action '{name}' has no registered model (tree assembly error)"
        );
        let mut ctx = self.ctx.clone();
        ctx.term_size = self.term_size;
        let model = self.registry.get_mut(&key).expect("checked above");

        match model.set_args(&ctx, &tokens) {
            Ok(outcome) => {
                if let Some(reason) = outcome.invalid {
                    // Bad args never enter handoff.
                    self.print(reason);
                    return;
                }
                self.active = Some(key.clone());
                self.state = ShellState::Handoff;
                self.apply_effect(outcome.startup);
                // Synchronous one-shot models finish inside set_args.
                if self
                    .registry
                    .get_mut(&key)
                    .is_some_and(|m| m.done())
                {
                    self.finish_handoff(&key);
                }
            }
            Err(err) => self.print(err.to_string()),
        }
    }

    // --- rendering ---

    /// Render the session: the child model during handoff, otherwise the
    /// scrollback and prompt. `rows` is the content height available.
    #[must_use]
    pub fn view(&self, rows: u16) -> Text<'static> {
        if self.state == ShellState::Handoff {
            if let Some(key) = &self.active {
                if let Some(model) = self.registry.get(key) {
                    return model.view(&self.theme);
                }
            }
        }

        let rows = rows as usize;
        let mut lines: Vec<Line<'static>> = Vec::new();
        let visible = rows.saturating_sub(1);
        let start = self.scrollback.len().saturating_sub(visible);
        for entry in &self.scrollback[start..] {
            lines.push(Line::from(entry.clone()));
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{}> ", self.prompt_path()), self.theme.primary_style()),
            Span::raw(self.input.clone()),
            Span::styled("_", self.theme.dim_style()),
        ]));
        Text::from(lines)
    }

    #[cfg(test)]
    pub(crate) fn type_line(&mut self, line: &str) {
        use crossterm::event::KeyEvent;
        for c in line.chars() {
            self.handle_event(&Event::Key(KeyEvent::from(KeyCode::Char(c))));
        }
        self.handle_event(&Event::Key(KeyEvent::from(KeyCode::Enter)));
    }
}
