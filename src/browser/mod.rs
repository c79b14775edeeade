//! The result browser: a tabbed, paginated viewport over one search's
//! results.
//!
//! Shown when a search produces results. The result set is materialized in
//! memory at construction and never mutated afterwards; every tab operates
//! on read-only views of it. A background heartbeat keeps the search alive
//! server-side while the browser is in use (see [`keepalive`]).
//!
//! Exactly one browser is live at a time: constructing a new one adopts
//! the shared search identity, which retires the previous browser's
//! heartbeat on its next wake.

pub mod download;
pub mod keepalive;
pub mod pager;
pub mod schedule;

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span, Text};

use crate::config::BrowserConfig;
use crate::remote::{SearchApi, SearchHandle};
use crate::tui::components::tab_line;
use crate::tui::events::Event;
use crate::tui::theme::Theme;

use download::DownloadTab;
use keepalive::SearchLiveness;
use pager::Pager;
use schedule::ScheduleTab;

/// Rows taken by the tab bar when visible.
const TAB_BAR_HEIGHT: u16 = 1;
/// Rows taken by the footer.
const FOOTER_HEIGHT: u16 = 1;

/// Browser tabs, dispatched by a match per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// The paginated result viewport.
    Results,
    /// Key-binding help.
    Help,
    /// Write results to a file.
    Download,
    /// Register the search as recurring.
    Schedule,
}

impl Tab {
    /// Tab titles, in display order.
    pub const TITLES: [&'static str; 4] = ["results", "help", "download", "schedule"];

    /// Position in the tab bar.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Results => 0,
            Self::Help => 1,
            Self::Download => 2,
            Self::Schedule => 3,
        }
    }

    /// Cycle forward.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Results => Self::Help,
            Self::Help => Self::Download,
            Self::Download => Self::Schedule,
            Self::Schedule => Self::Results,
        }
    }

    /// Cycle backward.
    #[must_use]
    pub fn prev(self) -> Self {
        match self {
            Self::Results => Self::Schedule,
            Self::Help => Self::Results,
            Self::Download => Self::Help,
            Self::Schedule => Self::Download,
        }
    }
}

/// Interactive browser over one search's materialized results.
pub struct Browser {
    handle: SearchHandle,
    data: Vec<String>,
    pager: Pager,
    scroll: usize,
    term_rows: u16,
    show_tab_bar: bool,
    tab: Tab,
    download: DownloadTab,
    schedule: ScheduleTab,
    api: Arc<dyn SearchApi>,
    liveness: Arc<SearchLiveness>,
    done: bool,
}

impl Browser {
    /// Build a browser and start its keep-alive heartbeat.
    ///
    /// Adopting the shared liveness identity is what supersedes any
    /// previous browser.
    pub fn new(
        handle: SearchHandle,
        data: Vec<String>,
        api: Arc<dyn SearchApi>,
        liveness: Arc<SearchLiveness>,
        cfg: &BrowserConfig,
        term_rows: u16,
    ) -> Self {
        liveness.adopt(&handle.id);
        keepalive::spawn_heartbeat(api.clone(), liveness.clone(), handle.id.clone());

        let pager = Pager::new(data.len(), cfg.page_size);
        Self {
            handle,
            data,
            pager,
            scroll: 0,
            term_rows,
            show_tab_bar: cfg.show_tab_bar,
            tab: Tab::Results,
            download: DownloadTab::new(),
            schedule: ScheduleTab::new(),
            api,
            liveness,
            done: false,
        }
    }

    /// Whether the user has left the browser.
    #[must_use]
    pub fn done(&self) -> bool {
        self.done
    }

    /// The active tab.
    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Result rows visible on the current page (before scrolling).
    #[must_use]
    pub fn visible_page(&self) -> &[String] {
        let (start, end) = self.pager.bounds();
        &self.data[start..end]
    }

    /// Scroll offset within the current page.
    #[must_use]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Rows available to the content area: terminal height minus the tab
    /// bar (when shown) and the footer. Recomputed on resize and tab-bar
    /// toggle by virtue of being derived.
    #[must_use]
    pub fn viewport_height(&self) -> u16 {
        let chrome = FOOTER_HEIGHT + if self.show_tab_bar { TAB_BAR_HEIGHT } else { 0 };
        self.term_rows.saturating_sub(chrome)
    }

    /// Process one event. Every call re-stamps the shared activity clock:
    /// any interaction extends the search's server-side life.
    pub fn update(&mut self, ev: &Event) {
        self.liveness.touch();
        match ev {
            Event::Resize(_, rows) => self.term_rows = *rows,
            Event::Key(key) => self.handle_key(key),
            Event::Tick => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        // Tab-agnostic keys run before per-tab dispatch.
        match key.code {
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return;
            }
            KeyCode::BackTab => {
                self.tab = self.tab.prev();
                return;
            }
            KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.show_tab_bar = !self.show_tab_bar;
                return;
            }
            KeyCode::Esc => {
                self.done = true;
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::Results => self.results_key(key),
            Tab::Help => {}
            Tab::Download => {
                if self.download.handle_key(key) {
                    self.download.submit(&self.data, &self.handle, self.api.as_ref());
                }
            }
            Tab::Schedule => {
                if self.schedule.handle_key(key) {
                    self.schedule.submit(&self.handle, self.api.as_ref());
                }
            }
        }
    }

    fn results_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Right | KeyCode::PageDown => {
                if self.pager.next_page() {
                    self.scroll = 0;
                }
            }
            KeyCode::Left | KeyCode::PageUp => {
                if self.pager.prev_page() {
                    self.scroll = 0;
                }
            }
            KeyCode::Home => {
                if self.pager.first_page() {
                    self.scroll = 0;
                }
            }
            KeyCode::End => {
                if self.pager.last_page() {
                    self.scroll = 0;
                }
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => {
                let max = self
                    .visible_page()
                    .len()
                    .saturating_sub(self.viewport_height() as usize);
                self.scroll = (self.scroll + 1).min(max);
            }
            _ => {}
        }
    }

    /// Render the browser as display text.
    #[must_use]
    pub fn view(&self, theme: &Theme) -> Text<'static> {
        let mut lines = Vec::new();

        if self.show_tab_bar {
            lines.push(tab_line(&Tab::TITLES, self.tab.index(), theme));
        }

        match self.tab {
            Tab::Results => self.results_view(theme, &mut lines),
            Tab::Help => help_view(&mut lines),
            Tab::Download => lines.extend(self.download.view(theme)),
            Tab::Schedule => lines.extend(self.schedule.view(theme)),
        }

        lines.push(self.footer(theme));
        Text::from(lines)
    }

    fn results_view(&self, theme: &Theme, lines: &mut Vec<Line<'static>>) {
        let (start, _) = self.pager.bounds();
        let viewport = self.viewport_height() as usize;
        for (offset, row) in self
            .visible_page()
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(viewport)
        {
            let absolute = start + offset;
            // Alternating stripes keyed by absolute index so paging does
            // not flip the pattern.
            let line = if absolute % 2 == 1 {
                Line::styled(row.clone(), theme.stripe_style())
            } else {
                Line::from(row.clone())
            };
            lines.push(line);
        }
    }

    fn footer(&self, theme: &Theme) -> Line<'static> {
        Line::from(vec![Span::styled(
            format!(
                "page {}/{}  {} results  search {} over {}  esc exits",
                self.pager.page() + 1,
                self.pager.page_count(),
                self.data.len(),
                self.handle.id,
                crate::util::format_duration_secs(self.handle.range.duration_secs()),
            ),
            theme.dim_style(),
        )])
    }
}

fn help_view(lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from("tab / shift-tab   cycle tabs"));
    lines.push(Line::from("left / right      previous / next page"));
    lines.push(Line::from("up / down         scroll within the page"));
    lines.push(Line::from("home / end        first / last page"));
    lines.push(Line::from("ctrl-b            toggle the tab bar"));
    lines.push(Line::from("alt-enter         submit a download/schedule form"));
    lines.push(Line::from("esc               back to the prompt"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::remote::{DownloadFormat, ScheduleRequest, ScheduledSearch, TimeRange};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    struct NoApi;
    impl SearchApi for NoApi {
        fn ping_search(&self, _id: &str) -> Result<()> {
            Ok(())
        }
        fn download_search(
            &self,
            _id: &str,
            _format: DownloadFormat,
            _w: &mut dyn std::io::Write,
        ) -> Result<u64> {
            Ok(0)
        }
        fn create_scheduled_search(&self, _req: &ScheduleRequest) -> Result<ScheduledSearch> {
            unimplemented!()
        }
    }

    fn sample_browser(data: Vec<String>, page_size: usize) -> Browser {
        let handle = SearchHandle {
            id: "s1".to_string(),
            query: "tag=syslog".to_string(),
            range: TimeRange::last(Duration::hours(1)),
        };
        let cfg = BrowserConfig {
            page_size,
            show_tab_bar: true,
        };
        Browser::new(
            handle,
            data,
            Arc::new(NoApi),
            Arc::new(SearchLiveness::new()),
            &cfg,
            24,
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::from(code))
    }

    #[test]
    fn test_paging_and_scroll_reset() {
        let data: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let mut browser = sample_browser(data, 2);

        assert_eq!(browser.visible_page(), ["a", "b"]);

        browser.scroll = 3;
        browser.update(&key(KeyCode::Right));
        assert_eq!(browser.visible_page(), ["c", "d"]);
        assert_eq!(browser.scroll(), 0);

        browser.update(&key(KeyCode::Right));
        assert_eq!(browser.visible_page(), ["e"]);
    }

    #[test]
    fn test_tab_cycling() {
        let mut browser = sample_browser(vec!["x".to_string()], 10);
        assert_eq!(browser.tab(), Tab::Results);
        browser.update(&key(KeyCode::Tab));
        assert_eq!(browser.tab(), Tab::Help);
        browser.update(&key(KeyCode::BackTab));
        assert_eq!(browser.tab(), Tab::Results);
        browser.update(&key(KeyCode::BackTab));
        assert_eq!(browser.tab(), Tab::Schedule);
    }

    #[test]
    fn test_esc_finishes_browser() {
        let mut browser = sample_browser(vec!["x".to_string()], 10);
        assert!(!browser.done());
        browser.update(&key(KeyCode::Esc));
        assert!(browser.done());
    }

    #[test]
    fn test_viewport_tracks_tab_bar_and_resize() {
        let mut browser = sample_browser(vec!["x".to_string()], 10);
        assert_eq!(browser.viewport_height(), 24 - 2);

        browser.update(&Event::Key(KeyEvent::new(
            KeyCode::Char('b'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(browser.viewport_height(), 24 - 1);

        browser.update(&Event::Resize(80, 10));
        assert_eq!(browser.viewport_height(), 10 - 1);
    }

    #[test]
    fn test_update_stamps_liveness() {
        let liveness = Arc::new(SearchLiveness::new());
        let handle = SearchHandle {
            id: "s9".to_string(),
            query: "q".to_string(),
            range: TimeRange::last(Duration::minutes(5)),
        };
        let mut browser = Browser::new(
            handle,
            vec!["x".to_string()],
            Arc::new(NoApi),
            liveness.clone(),
            &BrowserConfig::default(),
            24,
        );
        assert_eq!(liveness.current_id(), "s9");

        // Any event counts as liveness, not just results-tab activity.
        let before = liveness.last_activity();
        browser.update(&Event::Tick);
        assert!(liveness.last_activity() >= before);
    }

    #[test]
    fn test_new_browser_supersedes_old_identity() {
        let liveness = Arc::new(SearchLiveness::new());
        liveness.adopt("old-search");
        let handle = SearchHandle {
            id: "new-search".to_string(),
            query: "q".to_string(),
            range: TimeRange::last(Duration::minutes(5)),
        };
        let _browser = Browser::new(
            handle,
            Vec::new(),
            Arc::new(NoApi),
            liveness.clone(),
            &BrowserConfig::default(),
            24,
        );
        assert_eq!(liveness.current_id(), "new-search");
    }
}
