//! Async driver that connects a [`SearchSession`] to the proxy endpoint.
//!
//! The session decides what to fetch; the viewer performs the HTTP call and
//! feeds the outcome back with the request token, so stale responses from a
//! superseded search are dropped by the session rather than applied.

use crate::error::{RepoProxyError, Result};
use crate::session::{FetchRequest, FetchedPage, PageView, SearchSession, SessionConfig, SortBy};
use crate::types::{ErrorResponse, RepoListResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client for the proxy's `/api/github` route.
pub struct ProxyClient {
    client: Client,
    base_url: Url,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("GitHub Repos Viewer/0.1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        let base_url = Url::parse(base_url)
            .map_err(|e| RepoProxyError::InvalidParameter(format!("Invalid proxy URL: {}", e)))?;

        Ok(ProxyClient { client, base_url })
    }

    /// Perform one fetch against the proxy. The error side is the
    /// human-readable message to surface in the session, matching the proxy's
    /// error body when one is available.
    pub async fn fetch(&self, request: &FetchRequest) -> std::result::Result<FetchedPage, String> {
        // Page 1 is the initial search; later pages are load-more fetches.
        let fallback = if request.page > 1 {
            "Error loading more repositories"
        } else {
            "Error fetching data"
        };

        let mut url = self
            .base_url
            .join("api/github")
            .map_err(|e| format!("Invalid proxy URL: {}", e))?;
        url.query_pairs_mut()
            .append_pair("username", &request.username)
            .append_pair("page", &request.page.to_string())
            .append_pair("per_page", &request.per_page.to_string());

        debug!(username = %request.username, page = request.page, "Fetching from proxy");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|_| fallback.to_string())?;

        if !response.status().is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => fallback.to_string(),
            };
            return Err(message);
        }

        let body: RepoListResponse = response
            .json()
            .await
            .map_err(|_| fallback.to_string())?;

        Ok(FetchedPage {
            repositories: body.repositories,
            has_more: body.has_more,
        })
    }
}

/// Session plus transport. One viewer per logical user; its loading flags
/// serialize all fetches, so no two requests are ever in flight at once.
pub struct Viewer {
    session: SearchSession,
    client: ProxyClient,
}

impl Viewer {
    pub fn new(proxy_url: &str, config: SessionConfig) -> Result<Self> {
        Ok(Viewer {
            session: SearchSession::new(config),
            client: ProxyClient::new(proxy_url)?,
        })
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Submit a username and fetch its first page.
    pub async fn search(&mut self, username: &str) {
        let Some(request) = self.session.begin_search(username) else {
            return;
        };
        let outcome = self.client.fetch(&request).await;
        self.session.finish_search(&request, outcome);
    }

    /// Fetch the next upstream page, if the session allows it.
    pub async fn load_more(&mut self) {
        let Some(request) = self.session.begin_load_more() else {
            return;
        };
        let outcome = self.client.fetch(&request).await;
        self.session.finish_load_more(&request, outcome);
    }

    pub fn set_sort(&mut self, sort_by: SortBy) {
        self.session.set_sort(sort_by);
    }

    pub fn set_local_page(&mut self, page: usize) {
        self.session.set_local_page(page);
    }

    pub fn view(&self) -> PageView {
        self.session.view()
    }
}
