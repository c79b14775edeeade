//! Blocking HTTP client for the remote indexer.
//!
//! Every interactive and one-shot command goes through [`RemoteClient`].
//! Requests carry a bearer token from config; 404 responses are mapped to
//! the distinguished [`TrawlError::NotFound`] so callers can report "no
//! item with that ID" instead of a generic failure.

pub mod types;

use std::io::Write;
use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::{Result, TrawlError};

pub use types::{
    CreateExtractor, CreateMacro, Dashboard, DownloadFormat, Extractor, Kit, Macro,
    ScheduleRequest, ScheduledSearch, SearchHandle, SearchResults, SearchState, SearchStatus,
    TimeRange,
};

/// Poll interval while waiting for a search to complete.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The slice of the remote API the result browser and its heartbeat need.
///
/// A trait seam so the browser and keep-alive loop can be exercised
/// without a live server.
pub trait SearchApi: Send + Sync {
    /// Keep a completed search alive server-side.
    fn ping_search(&self, id: &str) -> Result<()>;

    /// Stream a whole-file rendering of the results into `w`.
    fn download_search(
        &self,
        id: &str,
        format: DownloadFormat,
        w: &mut dyn Write,
    ) -> Result<u64>;

    /// Register a recurring search.
    fn create_scheduled_search(&self, req: &ScheduleRequest) -> Result<ScheduledSearch>;
}

/// Blocking client for the remote indexer API.
pub struct RemoteClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::blocking::Client,
}

impl RemoteClient {
    /// Build a client from remote configuration.
    ///
    /// Fails with [`TrawlError::NoRemote`] when no URL is configured.
    pub fn new(cfg: &RemoteConfig) -> Result<Self> {
        let url = cfg.url.clone().ok_or(TrawlError::NoRemote)?;
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("trawl/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| TrawlError::remote("building HTTP client", e))?;

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            token: cfg.token.clone(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Map a response's status; 404 becomes `NotFound` for `kind`/`id`.
    fn check_status(
        resp: reqwest::blocking::Response,
        context: &str,
        not_found: Option<(&str, &str)>,
    ) -> Result<reqwest::blocking::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status.as_u16() == 404 {
            if let Some((kind, id)) = not_found {
                return Err(TrawlError::not_found(kind, id));
            }
        }
        Err(TrawlError::RemoteStatus {
            status: status.as_u16(),
            context: context.to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
        not_found: Option<(&str, &str)>,
    ) -> Result<T> {
        debug!(path, "GET");
        let resp = self
            .authorize(self.http.get(self.url(path)))
            .send()
            .map_err(|e| TrawlError::remote(context.to_string(), e))?;
        Self::check_status(resp, context, not_found)?
            .json()
            .map_err(|e| TrawlError::remote(format!("decoding {context}"), e))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<T> {
        debug!(path, "POST");
        let resp = self
            .authorize(self.http.post(self.url(path)))
            .json(body)
            .send()
            .map_err(|e| TrawlError::remote(context.to_string(), e))?;
        Self::check_status(resp, context, None)?
            .json()
            .map_err(|e| TrawlError::remote(format!("decoding {context}"), e))
    }

    fn delete(&self, path: &str, context: &str, kind: &str, id: &str) -> Result<()> {
        debug!(path, "DELETE");
        let resp = self
            .authorize(self.http.delete(self.url(path)))
            .send()
            .map_err(|e| TrawlError::remote(context.to_string(), e))?;
        Self::check_status(resp, context, Some((kind, id)))?;
        Ok(())
    }

    // --- searches ---

    /// Submit a search over a time window.
    pub fn submit_search(&self, query: &str, range: TimeRange) -> Result<SearchHandle> {
        #[derive(Serialize)]
        struct SubmitRequest<'a> {
            query: &'a str,
            range: TimeRange,
        }
        #[derive(serde::Deserialize)]
        struct SubmitResponse {
            id: String,
        }

        let resp: SubmitResponse = self.post_json(
            "/api/search",
            &SubmitRequest { query, range },
            "submitting search",
        )?;
        Ok(SearchHandle {
            id: resp.id,
            query: query.to_string(),
            range,
        })
    }

    /// Block until the search reports completion.
    ///
    /// A `Failed` state surfaces as [`TrawlError::SearchError`] with the
    /// server's message.
    pub fn wait_for_search(&self, handle: &SearchHandle) -> Result<()> {
        loop {
            let status: SearchStatus = self.get_json(
                &format!("/api/search/{}/status", handle.id),
                "polling search status",
                Some(("search", &handle.id)),
            )?;
            match status.state {
                SearchState::Complete => return Ok(()),
                SearchState::Failed => {
                    return Err(TrawlError::search(
                        status.error.unwrap_or_else(|| "search failed".to_string()),
                    ));
                }
                SearchState::Pending | SearchState::Running => {
                    thread::sleep(WAIT_POLL_INTERVAL);
                }
            }
        }
    }

    /// Fetch rendered text results for a completed search.
    pub fn fetch_text_results(
        &self,
        handle: &SearchHandle,
        offset: u64,
        limit: u64,
    ) -> Result<SearchResults> {
        self.get_json(
            &format!(
                "/api/search/{}/results?offset={offset}&limit={limit}",
                handle.id
            ),
            "fetching search results",
            Some(("search", &handle.id)),
        )
    }

    // --- macros ---

    /// List all macros.
    pub fn list_macros(&self) -> Result<Vec<Macro>> {
        self.get_json("/api/macros", "listing macros", None)
    }

    /// Create a macro.
    pub fn create_macro(&self, req: &CreateMacro) -> Result<Macro> {
        self.post_json("/api/macros", req, "creating macro")
    }

    /// Delete a macro by ID.
    pub fn delete_macro(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/macros/{id}"), "deleting macro", "macro", id)
    }

    // --- kits ---

    /// List installed kits.
    pub fn list_kits(&self) -> Result<Vec<Kit>> {
        self.get_json("/api/kits", "listing kits", None)
    }

    /// Fetch one kit by ID.
    pub fn get_kit(&self, id: &str) -> Result<Kit> {
        self.get_json(
            &format!("/api/kits/{id}"),
            "fetching kit",
            Some(("kit", id)),
        )
    }

    /// Delete a kit by ID.
    pub fn delete_kit(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/kits/{id}"), "deleting kit", "kit", id)
    }

    // --- dashboards ---

    /// List dashboards.
    pub fn list_dashboards(&self) -> Result<Vec<Dashboard>> {
        self.get_json("/api/dashboards", "listing dashboards", None)
    }

    /// Delete a dashboard by ID.
    pub fn delete_dashboard(&self, id: &str) -> Result<()> {
        self.delete(
            &format!("/api/dashboards/{id}"),
            "deleting dashboard",
            "dashboard",
            id,
        )
    }

    // --- extractors ---

    /// List field extractors.
    pub fn list_extractors(&self) -> Result<Vec<Extractor>> {
        self.get_json("/api/extractors", "listing extractors", None)
    }

    /// Create a field extractor.
    pub fn create_extractor(&self, req: &CreateExtractor) -> Result<Extractor> {
        self.post_json("/api/extractors", req, "creating extractor")
    }

    /// Delete a field extractor by ID.
    pub fn delete_extractor(&self, id: &str) -> Result<()> {
        self.delete(
            &format!("/api/extractors/{id}"),
            "deleting extractor",
            "extractor",
            id,
        )
    }

    // --- scheduled searches ---

    /// List scheduled searches.
    pub fn list_scheduled(&self) -> Result<Vec<ScheduledSearch>> {
        self.get_json("/api/scheduled", "listing scheduled searches", None)
    }

    /// Delete a scheduled search by ID.
    pub fn delete_scheduled(&self, id: &str) -> Result<()> {
        self.delete(
            &format!("/api/scheduled/{id}"),
            "deleting scheduled search",
            "scheduled search",
            id,
        )
    }
}

impl SearchApi for RemoteClient {
    fn ping_search(&self, id: &str) -> Result<()> {
        debug!(id, "ping search");
        let context = "pinging search";
        let resp = self
            .authorize(self.http.put(self.url(&format!("/api/search/{id}/ping"))))
            .send()
            .map_err(|e| TrawlError::remote(context, e))?;
        Self::check_status(resp, context, Some(("search", id)))?;
        Ok(())
    }

    fn download_search(
        &self,
        id: &str,
        format: DownloadFormat,
        w: &mut dyn Write,
    ) -> Result<u64> {
        let context = "downloading search results";
        let resp = self
            .authorize(self.http.get(self.url(&format!(
                "/api/search/{id}/download?format={}",
                format.as_str()
            ))))
            .send()
            .map_err(|e| TrawlError::remote(context, e))?;
        let mut resp = Self::check_status(resp, context, Some(("search", id)))?;
        resp.copy_to(w)
            .map_err(|e| TrawlError::remote("writing downloaded results", e))
    }

    fn create_scheduled_search(&self, req: &ScheduleRequest) -> Result<ScheduledSearch> {
        self.post_json("/api/scheduled", req, "creating scheduled search")
    }
}
