//! The query action: submit a search, wait for it, browse the results.
//!
//! Submission spawns a background wait task so the shell stays responsive
//! behind a spinner. The completion handoff is single-consumer: the
//! channel receiver is dropped after the first successful read. Once
//! results arrive, a [`Browser`] takes over until the user leaves it.
//!
//! The wait task is not cancellable. Abandoning the wait (or killing the
//! session) drops the receiver; the remote wait runs to completion and its
//! result is discarded. That leak is accepted for a short-lived CLI
//! session.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use chrono::Duration;
use ratatui::text::{Line, Text};

use crate::browser::keepalive::SearchLiveness;
use crate::browser::Browser;
use crate::config::BrowserConfig;
use crate::error::Result;
use crate::remote::{SearchApi, SearchHandle, SearchResults, TimeRange};
use crate::shell::action::{Action, ArgOutcome, Effect, SessionContext};
use crate::tui::components::spinner_frame;
use crate::tui::events::Event;
use crate::tui::theme::Theme;

/// Upper bound on result lines materialized for browsing.
const MAX_FETCH_RESULTS: u64 = 10_000;

/// Fallback rows used before the first resize event arrives.
const DEFAULT_TERM_ROWS: u16 = 24;

type SearchOutcome = Result<(SearchHandle, SearchResults)>;

enum Phase {
    /// Nothing in flight.
    Idle,
    /// A background task is blocking on the remote search.
    Waiting {
        /// Completion handoff; taken on the first ready poll so the signal
        /// can never be consumed twice.
        rx: Option<Receiver<SearchOutcome>>,
        tick: usize,
        query: String,
    },
    /// Results arrived; the browser has the session.
    Browsing(Box<Browser>),
}

/// Interactive model for search submission.
pub struct QueryAction {
    phase: Phase,
    finished: bool,
    api: Option<Arc<dyn SearchApi>>,
    liveness: Option<Arc<SearchLiveness>>,
    browser_cfg: BrowserConfig,
    term_rows: u16,
}

impl Default for QueryAction {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryAction {
    /// Create the model. Configuration arrives per-invocation via
    /// `set_args`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            finished: false,
            api: None,
            liveness: None,
            browser_cfg: BrowserConfig::default(),
            term_rows: DEFAULT_TERM_ROWS,
        }
    }

    fn poll_completion(&mut self) -> Effect {
        let Phase::Waiting { rx, .. } = &mut self.phase else {
            return Effect::None;
        };
        let outcome = match rx.as_ref().map(Receiver::try_recv) {
            Some(Ok(outcome)) => {
                *rx = None;
                outcome
            }
            Some(Err(TryRecvError::Empty)) => return Effect::None,
            Some(Err(TryRecvError::Disconnected)) | None => {
                self.finished = true;
                self.phase = Phase::Idle;
                return Effect::Print("search task died unexpectedly".to_string());
            }
        };

        match outcome {
            Ok((handle, results)) => {
                if results.lines.is_empty() {
                    self.finished = true;
                    self.phase = Phase::Idle;
                    return Effect::Print(format!("no results for search {}", handle.id));
                }
                let api = self.api.clone().expect("api captured at set_args");
                let liveness = self.liveness.clone().expect("liveness captured at set_args");
                let total = results.total;
                let shown = results.lines.len();
                let browser = Browser::new(
                    handle,
                    results.lines,
                    api,
                    liveness,
                    &self.browser_cfg,
                    self.term_rows,
                );
                self.phase = Phase::Browsing(Box::new(browser));
                if (shown as u64) < total {
                    Effect::Print(format!("showing first {shown} of {total} results"))
                } else {
                    Effect::None
                }
            }
            Err(err) => {
                self.finished = true;
                self.phase = Phase::Idle;
                Effect::Print(err.to_string())
            }
        }
    }
}

impl Action for QueryAction {
    fn update(&mut self, ev: &Event) -> Effect {
        if let Event::Resize(_, rows) = ev {
            self.term_rows = *rows;
        }

        if matches!(self.phase, Phase::Waiting { .. }) {
            return match ev {
                Event::Tick => {
                    if let Phase::Waiting { tick, .. } = &mut self.phase {
                        *tick += 1;
                    }
                    self.poll_completion()
                }
                Event::Key(key) if key.code == crossterm::event::KeyCode::Esc => {
                    // Abandon the wait. The background task keeps running
                    // until the remote returns; nothing reads its result.
                    self.finished = true;
                    self.phase = Phase::Idle;
                    Effect::Print(
                        "search abandoned (the remote wait is not cancelled)".to_string(),
                    )
                }
                _ => Effect::None,
            };
        }

        if let Phase::Browsing(browser) = &mut self.phase {
            browser.update(ev);
            if browser.done() {
                self.finished = true;
            }
        }
        Effect::None
    }

    fn view(&self, theme: &Theme) -> Text<'static> {
        match &self.phase {
            Phase::Idle => Text::default(),
            Phase::Waiting { tick, query, .. } => Text::from(vec![
                Line::from(format!("searching {} {}", spinner_frame(*tick), query)),
                Line::styled(
                    "esc abandons the wait".to_string(),
                    theme.dim_style(),
                ),
            ]),
            Phase::Browsing(browser) => browser.view(theme),
        }
    }

    fn done(&self) -> bool {
        self.finished
    }

    fn reset(&mut self) -> Result<()> {
        self.phase = Phase::Idle;
        self.finished = false;
        self.api = None;
        self.liveness = None;
        Ok(())
    }

    fn set_args(&mut self, ctx: &SessionContext, tokens: &[String]) -> Result<ArgOutcome> {
        let (window, query_tokens) = match split_window_flag(tokens) {
            Ok(parts) => parts,
            Err(reason) => return Ok(ArgOutcome::invalid(reason)),
        };
        let query = query_tokens.join(" ");
        if query.trim().is_empty() {
            return Ok(ArgOutcome::invalid(
                "usage: query [--last <duration>] <query>",
            ));
        }

        self.api = Some(ctx.api());
        self.liveness = Some(ctx.liveness.clone());
        self.browser_cfg = ctx.config.browser.clone();
        self.term_rows = ctx.term_size.1;

        let range = TimeRange::last(window);
        let client = ctx.client.clone();
        let task_query = query.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = client.submit_search(&task_query, range).and_then(|handle| {
                client.wait_for_search(&handle)?;
                let results = client.fetch_text_results(&handle, 0, MAX_FETCH_RESULTS)?;
                Ok((handle, results))
            });
            // The receiver may be gone if the user abandoned the wait.
            let _ = tx.send(outcome);
        });

        self.phase = Phase::Waiting {
            rx: Some(rx),
            tick: 0,
            query,
        };
        self.finished = false;
        Ok(ArgOutcome::accepted())
    }
}

/// Split a leading `--last <duration>` flag off the query tokens.
///
/// Defaults to the last hour when the flag is absent.
fn split_window_flag(tokens: &[String]) -> std::result::Result<(Duration, &[String]), String> {
    if tokens.first().is_some_and(|t| t == "--last") {
        let Some(spec) = tokens.get(1) else {
            return Err("--last needs a duration (e.g. --last 15m)".to_string());
        };
        let std_duration = humantime::parse_duration(spec)
            .map_err(|e| format!("bad duration '{spec}': {e}"))?;
        let window = Duration::from_std(std_duration)
            .map_err(|_| format!("duration '{spec}' is out of range"))?;
        return Ok((window, &tokens[2..]));
    }
    Ok((Duration::hours(1), tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::keepalive::SearchLiveness;
    use crate::config::{Config, RemoteConfig};
    use crate::remote::RemoteClient;
    use std::time::{Duration as StdDuration, Instant};

    fn test_ctx() -> SessionContext {
        // Port 1 refuses connections immediately, so wait tasks fail fast.
        let remote = RemoteConfig {
            url: Some("http://127.0.0.1:1".to_string()),
            token: None,
            timeout_secs: 1,
        };
        SessionContext {
            client: Arc::new(RemoteClient::new(&remote).unwrap()),
            config: Config::default(),
            liveness: Arc::new(SearchLiveness::new()),
            term_size: (80, 24),
        }
    }

    fn to_tokens(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_empty_query_is_invalid() {
        let mut action = QueryAction::new();
        let outcome = action.set_args(&test_ctx(), &[]).unwrap();
        assert!(outcome.invalid.is_some());
    }

    #[test]
    fn test_bad_duration_is_invalid() {
        let mut action = QueryAction::new();
        let outcome = action
            .set_args(&test_ctx(), &to_tokens(&["--last", "soon", "tag=x"]))
            .unwrap();
        assert!(outcome.invalid.unwrap().contains("bad duration"));
    }

    #[test]
    fn test_split_window_flag() {
        let tokens = to_tokens(&["--last", "15m", "tag=syslog"]);
        let (window, rest) = split_window_flag(&tokens).unwrap();
        assert_eq!(window, Duration::minutes(15));
        assert_eq!(rest, &tokens[2..]);

        let bare = to_tokens(&["tag=syslog"]);
        let (window, rest) = split_window_flag(&bare).unwrap();
        assert_eq!(window, Duration::hours(1));
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_failed_search_finishes_with_message() {
        let mut action = QueryAction::new();
        let outcome = action
            .set_args(&test_ctx(), &to_tokens(&["tag=syslog"]))
            .unwrap();
        assert!(outcome.invalid.is_none());
        assert!(!action.done());

        // Tick until the connection failure propagates back.
        let deadline = Instant::now() + StdDuration::from_secs(10);
        let mut printed = None;
        while Instant::now() < deadline && !action.done() {
            if let Effect::Print(msg) = action.update(&Event::Tick) {
                printed = Some(msg);
            }
            thread::sleep(StdDuration::from_millis(10));
        }
        assert!(action.done(), "wait task never reported");
        assert!(printed.unwrap().contains("Remote request failed"));
    }

    #[test]
    fn test_escape_abandons_wait() {
        let mut action = QueryAction::new();
        action
            .set_args(&test_ctx(), &to_tokens(&["tag=syslog"]))
            .unwrap();

        let esc = Event::Key(crossterm::event::KeyEvent::from(
            crossterm::event::KeyCode::Esc,
        ));
        let effect = action.update(&esc);
        assert!(action.done());
        assert!(matches!(effect, Effect::Print(msg) if msg.contains("abandoned")));
    }

    #[test]
    fn test_reset_clears_invocation_state() {
        let mut action = QueryAction::new();
        action
            .set_args(&test_ctx(), &to_tokens(&["tag=syslog"]))
            .unwrap();
        action.reset().unwrap();
        assert!(!action.done());
        assert!(matches!(action.phase, Phase::Idle));
        assert!(action.api.is_none());
    }
}
