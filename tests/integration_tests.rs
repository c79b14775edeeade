//! Integration tests for the interactive session core.
//!
//! These drive the shell, walker, history, and result browser through
//! their public APIs, covering the end-to-end prompt scenarios without a
//! terminal or a live remote.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use pretty_assertions::assert_eq;

use trawl::actions::assemble;
use trawl::browser::keepalive::SearchLiveness;
use trawl::browser::{Browser, Tab};
use trawl::config::{BrowserConfig, Config, RemoteConfig};
use trawl::remote::{
    DownloadFormat, RemoteClient, ScheduleRequest, ScheduledSearch, SearchApi, SearchHandle,
    TimeRange,
};
use trawl::shell::action::SessionContext;
use trawl::shell::{Shell, ShellState};
use trawl::tui::events::Event;

struct NoApi;

impl SearchApi for NoApi {
    fn ping_search(&self, _id: &str) -> trawl::Result<()> {
        Ok(())
    }
    fn download_search(
        &self,
        _id: &str,
        _format: DownloadFormat,
        _w: &mut dyn std::io::Write,
    ) -> trawl::Result<u64> {
        Ok(0)
    }
    fn create_scheduled_search(&self, _req: &ScheduleRequest) -> trawl::Result<ScheduledSearch> {
        unimplemented!("not exercised")
    }
}

fn test_ctx() -> SessionContext {
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

fn fresh_shell() -> Shell {
    let (tree, registry) = assemble();
    Shell::new(tree, registry, test_ctx())
}

fn type_line(shell: &mut Shell, line: &str) {
    for c in line.chars() {
        shell.handle_event(&Event::Key(KeyEvent::from(KeyCode::Char(c))));
    }
    shell.handle_event(&Event::Key(KeyEvent::from(KeyCode::Enter)));
}

mod shell_scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Fresh session, bare `help`: context help for the root directory
    /// prints and the session stays at the prompt.
    #[test]
    fn help_at_root_stays_prompting() {
        let mut shell = fresh_shell();
        type_line(&mut shell, "help");

        assert_eq!(shell.state(), ShellState::Prompting);
        let joined = shell.scrollback().join("\n");
        assert!(joined.contains("macros"));
        assert!(joined.contains("kits"));
        assert!(joined.contains("query"));
        assert!(joined.contains("builtins:"));
    }

    /// `.. .. status` from three levels deep: the unknown final token
    /// errors, but the two `..` hops persist.
    #[test]
    fn partial_navigation_survives_unknown_token() {
        let mut shell = fresh_shell();
        // assemble() has no three-deep Nav chain, so build the position
        // with two hops instead: macros is one deep; go down, then up-up
        // into an unknown token from root's perspective.
        type_line(&mut shell, "macros");
        assert_eq!(shell.prompt_path(), "/macros");

        type_line(&mut shell, ".. dashboards");
        assert_eq!(shell.prompt_path(), "/dashboards");

        type_line(&mut shell, ".. .. status");
        let joined = shell.scrollback().join("\n");
        assert!(joined.contains("unknown command 'status'"));
        // Both hops landed (root's parent is itself), the bad token did
        // not undo them.
        assert_eq!(shell.prompt_path(), "/");
        assert_eq!(shell.state(), ShellState::Prompting);
    }

    #[test]
    fn aliases_navigate_like_names() {
        let mut shell = fresh_shell();
        type_line(&mut shell, "m");
        assert_eq!(shell.prompt_path(), "/macros");
        type_line(&mut shell, "..");
        type_line(&mut shell, "db");
        assert_eq!(shell.prompt_path(), "/dashboards");
    }

    #[test]
    fn builtins_reachable_from_subdirectories() {
        let mut shell = fresh_shell();
        type_line(&mut shell, "kits");
        type_line(&mut shell, "history");
        let joined = shell.scrollback().join("\n");
        assert!(joined.contains("kits"));
        assert_eq!(shell.state(), ShellState::Prompting);
    }

    #[test]
    fn quit_builtin_terminates_with_farewell() {
        let mut shell = fresh_shell();
        type_line(&mut shell, "quit");
        assert_eq!(shell.state(), ShellState::Quitting);
        assert_eq!(shell.farewell(), Some("goodbye"));
    }

    #[test]
    fn invalid_query_args_stay_at_prompt() {
        let mut shell = fresh_shell();
        // `query` with no tokens is a usage error: no handoff.
        type_line(&mut shell, "query");
        assert_eq!(shell.state(), ShellState::Prompting);
        assert!(shell
            .scrollback()
            .iter()
            .any(|l| l.contains("usage: query")));
    }

    #[test]
    fn query_enters_handoff_and_esc_returns() {
        let mut shell = fresh_shell();
        type_line(&mut shell, "query tag=syslog");
        assert_eq!(shell.state(), ShellState::Handoff);

        // Esc abandons the wait; the model finishes and the prompt
        // returns.
        shell.handle_event(&Event::Key(KeyEvent::from(KeyCode::Esc)));
        assert_eq!(shell.state(), ShellState::Prompting);
        assert!(shell
            .scrollback()
            .iter()
            .any(|l| l.contains("abandoned")));
    }
}

mod browser_scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_browser(page_size: usize) -> Browser {
        let handle = SearchHandle {
            id: "search-1".to_string(),
            query: "tag=syslog".to_string(),
            range: TimeRange::last(chrono::Duration::hours(1)),
        };
        let data: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        Browser::new(
            handle,
            data,
            Arc::new(NoApi),
            Arc::new(SearchLiveness::new()),
            &BrowserConfig {
                page_size,
                show_tab_bar: true,
            },
            24,
        )
    }

    /// Browser over `a..e`, page size 2: first page `a,b`; advancing
    /// shows `c,d`; scroll resets to top on the page change.
    #[test]
    fn pagination_over_fixed_data() {
        let mut browser = sample_browser(2);
        assert_eq!(browser.visible_page(), ["a", "b"]);

        browser.update(&Event::Key(KeyEvent::from(KeyCode::Right)));
        assert_eq!(browser.visible_page(), ["c", "d"]);
        assert_eq!(browser.scroll(), 0);
    }

    #[test]
    fn tab_cycle_and_exit() {
        let mut browser = sample_browser(2);
        browser.update(&Event::Key(KeyEvent::from(KeyCode::Tab)));
        assert_eq!(browser.tab(), Tab::Help);
        browser.update(&Event::Key(KeyEvent::from(KeyCode::Esc)));
        assert!(browser.done());
    }

    #[test]
    fn browsing_keeps_search_alive() {
        let liveness = Arc::new(SearchLiveness::new());
        let handle = SearchHandle {
            id: "search-7".to_string(),
            query: "q".to_string(),
            range: TimeRange::last(chrono::Duration::minutes(10)),
        };
        let mut browser = Browser::new(
            handle,
            vec!["row".to_string()],
            Arc::new(NoApi),
            liveness.clone(),
            &BrowserConfig::default(),
            24,
        );

        assert_eq!(liveness.current_id(), "search-7");
        let before = liveness.last_activity();
        browser.update(&Event::Tick);
        assert!(liveness.last_activity() >= before);
    }
}

mod history_scenarios {
    use super::*;
    use pretty_assertions::assert_eq;
    use trawl::history::HistoryRing;

    #[test]
    fn get_all_records_newest_first() {
        let mut ring = HistoryRing::new();
        for cmd in ["first", "second", "third"] {
            ring.insert(cmd);
        }
        assert_eq!(ring.records(), vec!["third", "second", "first"]);
    }

    #[test]
    fn restart_after_unset_matches_fresh_buffer() {
        let mut scrolled = HistoryRing::new();
        let mut fresh = HistoryRing::new();
        for cmd in ["a", "b", "c"] {
            scrolled.insert(cmd);
            fresh.insert(cmd);
        }

        // Scroll partway, reset, and the next fetch matches a fresh
        // buffer's first fetch.
        let _ = scrolled.get_record();
        let _ = scrolled.get_record();
        scrolled.unset_fetch();

        assert_eq!(scrolled.get_record(), fresh.get_record());
    }
}
