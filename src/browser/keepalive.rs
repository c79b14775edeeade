//! Keep-alive heartbeat for the active search.
//!
//! While results are being browsed, the server must be told the search is
//! still wanted or it expires it. The browser has no reliable destruction
//! hook (the shell can reclaim control at any time without notifying its
//! child), so the heartbeat infers its own obsolescence instead of being
//! cancelled: it stops when a newer browser has taken over the shared
//! identity, or when user activity has aged out.
//!
//! There is deliberately no cancellation token; a heartbeat orphaned by
//! abrupt process exit dies with the process.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::remote::SearchApi;

/// Seconds of user inactivity after which a heartbeat assumes its browser
/// died without cleanup.
pub const AGE_OUT_SECS: i64 = 300;

/// Sleep between pings. Safely under the age-out with margin for
/// scheduling jitter.
pub const PING_INTERVAL: Duration = Duration::from_secs(50);

/// Shared liveness oracle for the single active search.
///
/// Owned by the shell and injected into each browser at construction. The
/// two fields are guarded independently: they are never read-modify-written
/// together, so one larger lock would buy nothing.
#[derive(Debug, Default)]
pub struct SearchLiveness {
    id: Mutex<String>,
    last_activity: Mutex<i64>,
}

/// What a heartbeat should do on a wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beat {
    /// The search is still active; ping it.
    Ping,
    /// This heartbeat is obsolete; terminate without pinging.
    Stop,
}

impl SearchLiveness {
    /// Create a fresh liveness handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of the active-search identity for a new browser.
    ///
    /// Any heartbeat watching a previous identity will observe the change
    /// and terminate, which is what enforces the one-live-browser rule.
    pub fn adopt(&self, search_id: &str) {
        *self.id.lock() = search_id.to_string();
        self.touch();
    }

    /// Record user activity now. Called from every browser update; any
    /// interaction counts as liveness, not just results-tab activity.
    pub fn touch(&self) {
        *self.last_activity.lock() = Utc::now().timestamp();
    }

    /// The currently adopted search ID.
    #[must_use]
    pub fn current_id(&self) -> String {
        self.id.lock().clone()
    }

    /// Unix timestamp of the most recent activity.
    #[must_use]
    pub fn last_activity(&self) -> i64 {
        *self.last_activity.lock()
    }

    /// Decide what a heartbeat owning `search_id` should do at `now`.
    #[must_use]
    pub fn next_beat(&self, search_id: &str, now: i64) -> Beat {
        if *self.id.lock() != search_id {
            // A newer browser superseded this one.
            return Beat::Stop;
        }
        if now - *self.last_activity.lock() > AGE_OUT_SECS {
            // The browser died without a graceful shutdown.
            return Beat::Stop;
        }
        Beat::Ping
    }
}

/// Start the background heartbeat for a browser over `search_id`.
pub fn spawn_heartbeat(
    api: Arc<dyn SearchApi>,
    liveness: Arc<SearchLiveness>,
    search_id: String,
) -> thread::JoinHandle<()> {
    thread::spawn(move || heartbeat_loop(api.as_ref(), &liveness, &search_id, PING_INTERVAL))
}

fn heartbeat_loop(
    api: &dyn SearchApi,
    liveness: &SearchLiveness,
    search_id: &str,
    interval: Duration,
) {
    loop {
        match liveness.next_beat(search_id, Utc::now().timestamp()) {
            Beat::Stop => {
                debug!(search_id, "heartbeat terminating");
                return;
            }
            Beat::Ping => {
                if let Err(err) = api.ping_search(search_id) {
                    // The search may be gone server-side; keep trying until
                    // the liveness check retires us.
                    warn!(search_id, %err, "keep-alive ping failed");
                }
            }
        }
        thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::remote::{DownloadFormat, ScheduleRequest, ScheduledSearch};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingApi {
        pings: AtomicUsize,
    }

    impl CountingApi {
        fn new() -> Self {
            Self {
                pings: AtomicUsize::new(0),
            }
        }
    }

    impl SearchApi for CountingApi {
        fn ping_search(&self, _id: &str) -> Result<()> {
            self.pings.fetch_add(1, Ordering::SeqCst);
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
            unimplemented!("not used by heartbeat tests")
        }
    }

    #[test]
    fn test_active_search_pings() {
        let liveness = SearchLiveness::new();
        liveness.adopt("s1");
        assert_eq!(liveness.next_beat("s1", Utc::now().timestamp()), Beat::Ping);
    }

    #[test]
    fn test_identity_mismatch_stops_without_ping() {
        let api = CountingApi::new();
        let liveness = SearchLiveness::new();
        liveness.adopt("s1");
        liveness.adopt("s2"); // a newer browser took over

        heartbeat_loop(&api, &liveness, "s1", Duration::from_millis(1));
        assert_eq!(api.pings.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stale_activity_stops_without_ping() {
        let api = CountingApi::new();
        let liveness = SearchLiveness::new();
        liveness.adopt("s1");

        let now = liveness.last_activity() + AGE_OUT_SECS + 1;
        assert_eq!(liveness.next_beat("s1", now), Beat::Stop);

        // Drive the real loop with the stale clock by backdating activity.
        *liveness.last_activity.lock() -= AGE_OUT_SECS + 1;
        heartbeat_loop(&api, &liveness, "s1", Duration::from_millis(1));
        assert_eq!(api.pings.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_activity_just_inside_threshold_pings() {
        let liveness = SearchLiveness::new();
        liveness.adopt("s1");
        let now = liveness.last_activity() + AGE_OUT_SECS;
        assert_eq!(liveness.next_beat("s1", now), Beat::Ping);
    }

    #[test]
    fn test_touch_extends_life() {
        let liveness = SearchLiveness::new();
        liveness.adopt("s1");
        *liveness.last_activity.lock() -= AGE_OUT_SECS - 10;
        liveness.touch();
        let now = Utc::now().timestamp() + AGE_OUT_SECS - 1;
        assert_eq!(liveness.next_beat("s1", now), Beat::Ping);
    }
}
