mod common;

use common::{spawn_proxy, upstream_page_json};
use github_repos_server::types::{ErrorResponse, RepoListResponse};
use httpmock::prelude::*;
use serde_json::json;
use std::net::SocketAddr;

fn proxy_url(addr: SocketAddr, query: &str) -> String {
    format!("http://{}/api/github{}", addr, query)
}

async fn get_error(addr: SocketAddr, query: &str) -> (u16, ErrorResponse) {
    let response = reqwest::get(proxy_url(addr, query))
        .await
        .expect("proxy request failed");
    let status = response.status().as_u16();
    let body = response.json().await.expect("expected an error body");
    (status, body)
}

#[tokio::test]
async fn missing_username_is_rejected() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/users/");
            then.status(200).json_body(json!([]));
        })
        .await;
    let addr = spawn_proxy(&server.base_url()).await;

    let (status, body) = get_error(addr, "").await;
    assert_eq!(status, 400);
    assert_eq!(body.error, "Username parameter is required");
    assert_eq!(body.kind.as_deref(), Some("invalid_parameter"));
    // Validation failures never reach upstream.
    assert_eq!(upstream.hits_async().await, 0);
}

#[tokio::test]
async fn blank_username_is_rejected() {
    let server = MockServer::start_async().await;
    let addr = spawn_proxy(&server.base_url()).await;

    let (status, body) = get_error(addr, "?username=%20%20").await;
    assert_eq!(status, 400);
    assert_eq!(body.error, "Invalid username format");
}

#[tokio::test]
async fn invalid_page_is_rejected_before_upstream() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("/users/");
            then.status(200).json_body(json!([]));
        })
        .await;
    let addr = spawn_proxy(&server.base_url()).await;

    for query in ["?username=octocat&page=0", "?username=octocat&page=abc"] {
        let (status, body) = get_error(addr, query).await;
        assert_eq!(status, 400);
        assert_eq!(body.error, "Invalid page parameter");
    }
    assert_eq!(upstream.hits_async().await, 0);
}

#[tokio::test]
async fn per_page_outside_bounds_is_rejected() {
    let server = MockServer::start_async().await;
    let addr = spawn_proxy(&server.base_url()).await;

    for query in [
        "?username=octocat&per_page=0",
        "?username=octocat&per_page=101",
        "?username=octocat&per_page=x",
    ] {
        let (status, body) = get_error(addr, query).await;
        assert_eq!(status, 400);
        assert_eq!(body.error, "Invalid per_page parameter (must be 1-100)");
    }
}

#[tokio::test]
async fn success_envelope_echoes_request_and_flags_more() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/octocat/repos")
                .query_param("page", "2")
                .query_param("per_page", "3");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(upstream_page_json(4, 3));
        })
        .await;
    let addr = spawn_proxy(&server.base_url()).await;

    let response = reqwest::get(proxy_url(addr, "?username=octocat&page=2&per_page=3"))
        .await
        .expect("proxy request failed");
    assert_eq!(response.status().as_u16(), 200);
    let body: RepoListResponse = response.json().await.expect("expected envelope");

    assert_eq!(body.count, 3);
    assert_eq!(body.repositories.len(), 3);
    assert_eq!(body.page, 2);
    assert_eq!(body.per_page, 3);
    assert!(body.has_more);
    // Exactly one upstream call, no retries.
    upstream.assert_async().await;
}

#[tokio::test]
async fn partial_page_reports_no_more_data() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octocat/repos");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(upstream_page_json(1, 2));
        })
        .await;
    let addr = spawn_proxy(&server.base_url()).await;

    let body: RepoListResponse = reqwest::get(proxy_url(addr, "?username=octocat&per_page=3"))
        .await
        .expect("proxy request failed")
        .json()
        .await
        .expect("expected envelope");

    assert_eq!(body.count, 2);
    assert!(!body.has_more);
}

#[tokio::test]
async fn defaults_are_page_one_per_page_thirty() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users/octocat/repos")
                .query_param("page", "1")
                .query_param("per_page", "30");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([]));
        })
        .await;
    let addr = spawn_proxy(&server.base_url()).await;

    let body: RepoListResponse = reqwest::get(proxy_url(addr, "?username=octocat"))
        .await
        .expect("proxy request failed")
        .json()
        .await
        .expect("expected envelope");

    upstream.assert_async().await;
    assert_eq!(body.page, 1);
    assert_eq!(body.per_page, 30);
}

#[tokio::test]
async fn upstream_not_found_maps_to_404() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/ghost/repos");
            then.status(404).json_body(json!({ "message": "Not Found" }));
        })
        .await;
    let addr = spawn_proxy(&server.base_url()).await;

    let (status, body) = get_error(addr, "?username=ghost").await;
    assert_eq!(status, 404);
    assert_eq!(body.error, "User not found");
    assert_eq!(body.kind.as_deref(), Some("not_found"));
}

#[tokio::test]
async fn upstream_forbidden_maps_to_429() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octocat/repos");
            then.status(403)
                .header("X-RateLimit-Remaining", "0")
                .json_body(json!({ "message": "API rate limit exceeded" }));
        })
        .await;
    let addr = spawn_proxy(&server.base_url()).await;

    let (status, body) = get_error(addr, "?username=octocat").await;
    assert_eq!(status, 429);
    assert_eq!(body.error, "Rate limit exceeded. Please try again later.");
    assert_eq!(body.kind.as_deref(), Some("rate_limited"));
}

#[tokio::test]
async fn other_upstream_statuses_pass_through() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octocat/repos");
            then.status(502).body("bad gateway");
        })
        .await;
    let addr = spawn_proxy(&server.base_url()).await;

    let (status, body) = get_error(addr, "?username=octocat").await;
    assert_eq!(status, 502);
    assert_eq!(body.error, "Failed to fetch repositories");
    assert_eq!(body.kind.as_deref(), Some("upstream_error"));
    assert_eq!(upstream.hits_async().await, 1);
}

#[tokio::test]
async fn unparseable_upstream_body_is_an_internal_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/octocat/repos");
            then.status(200)
                .header("content-type", "application/json")
                .body("not json");
        })
        .await;
    let addr = spawn_proxy(&server.base_url()).await;

    let (status, body) = get_error(addr, "?username=octocat").await;
    assert_eq!(status, 500);
    assert_eq!(body.error, "Internal server error");
    assert_eq!(body.kind.as_deref(), Some("internal"));
}

#[tokio::test]
async fn health_endpoint_reports_alive() {
    let server = MockServer::start_async().await;
    let addr = spawn_proxy(&server.base_url()).await;

    let response = reqwest::get(format!("http://{}/health", addr))
        .await
        .expect("health request failed");
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("expected JSON body");
    assert_eq!(body["status"], "alive");
}
