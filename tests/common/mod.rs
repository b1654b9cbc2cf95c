#![allow(dead_code)]

use github_repos_server::github::GitHubClient;
use github_repos_server::server::{create_router, AppState};
use github_repos_server::types::Repository;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

/// Spawn the proxy server on an ephemeral port, pointed at the given
/// upstream base URL. Returns the address the proxy is listening on.
pub async fn spawn_proxy(upstream_url: &str) -> SocketAddr {
    let github =
        GitHubClient::with_base_url(upstream_url, None).expect("Failed to create GitHub client");
    let app = create_router(AppState {
        github: Arc::new(github),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to get local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Proxy server failed");
    });

    addr
}

/// A repository object in the shape the GitHub API returns, with only the
/// fields the server reads plus a few it should ignore.
pub fn upstream_repo_json(id: u64, name: &str, stars: u32, forks: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("octocat/{}", name),
        "description": format!("Repository {}", name),
        "html_url": format!("https://github.com/octocat/{}", name),
        "stargazers_count": stars,
        "forks_count": forks,
        "language": "Rust",
        "private": false,
        "fork": false
    })
}

/// A page of n upstream repositories with distinct ids.
pub fn upstream_page_json(start_id: u64, n: usize) -> Value {
    let repos: Vec<Value> = (0..n as u64)
        .map(|i| {
            upstream_repo_json(
                start_id + i,
                &format!("repo-{}", start_id + i),
                100 + i as u32,
                10 + i as u32,
            )
        })
        .collect();
    Value::Array(repos)
}

/// In-memory repository record for state machine tests.
pub fn repo(id: u64, stars: u32, forks: u32) -> Repository {
    Repository {
        id,
        name: format!("repo-{}", id),
        description: None,
        html_url: format!("https://github.com/octocat/repo-{}", id),
        stargazers_count: stars,
        forks_count: forks,
        language: None,
    }
}
