use crate::error::{RepoProxyError, Result};
use crate::types::Repository;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

/// Rate limit state parsed from upstream response headers.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    pub remaining: u32,
    pub reset_time: Option<DateTime<Utc>>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL, token)
    }

    /// Build a client against a non-default API root. Tests point this at a
    /// local mock server.
    pub fn with_base_url(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("GitHub Repos Server/0.1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        let base_url = Url::parse(base_url)
            .map_err(|e| RepoProxyError::InvalidParameter(format!("Invalid API base URL: {}", e)))?;

        Ok(GitHubClient {
            client,
            base_url,
            token,
        })
    }

    async fn make_request(&self, url: Url) -> Result<Response> {
        let mut request = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await?;
        let rate_limit = rate_limit_state(&response);

        match response.status() {
            reqwest::StatusCode::OK => {
                if rate_limit.remaining < 10 {
                    warn!(
                        remaining = rate_limit.remaining,
                        "GitHub rate limit running low"
                    );
                }
                Ok(response)
            }
            reqwest::StatusCode::NOT_FOUND => Err(RepoProxyError::UserNotFound(format!(
                "Resource not found: {}",
                url.path()
            ))),
            reqwest::StatusCode::FORBIDDEN => {
                let reset = rate_limit
                    .reset_time
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "unknown".to_string());
                Err(RepoProxyError::RateLimitExceeded(format!(
                    "API rate limit exceeded. Resets at: {}",
                    reset
                )))
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(RepoProxyError::UpstreamFailure {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Fetch one page of a user's public repositories. Issues exactly one
    /// upstream request; callers decide whether and when to fetch more.
    ///
    /// The returned flag is the has-more heuristic: true iff the page came
    /// back exactly full. An account whose last page is exactly full will
    /// report one spurious extra page; the follow-up fetch returns empty and
    /// clears the flag.
    pub async fn list_user_repos(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Repository>, bool)> {
        let mut url = self
            .base_url
            .join(&format!("users/{}/repos", username))
            .map_err(|e| RepoProxyError::InvalidParameter(format!("Invalid username: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());

        debug!(username, page, per_page, "Fetching repositories from GitHub");

        let response = self.make_request(url).await?;
        let repositories: Vec<Repository> = response.json().await?;
        let has_more = repositories.len() == per_page as usize;

        Ok((repositories, has_more))
    }
}

fn rate_limit_state(response: &Response) -> RateLimitState {
    let headers = response.headers();

    let remaining = headers
        .get("X-RateLimit-Remaining")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(u32::MAX);

    let reset_time = headers
        .get("X-RateLimit-Reset")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0));

    RateLimitState {
        remaining,
        reset_time,
    }
}
