use serde::{Deserialize, Serialize};

// GitHub API response structure for a repository, trimmed to the fields the
// viewer exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u32,
    pub forks_count: u32,
    pub language: Option<String>,
}

/// Success envelope returned by the proxy endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoListResponse {
    pub repositories: Vec<Repository>,
    pub count: usize,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

/// Error envelope returned by the proxy endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
