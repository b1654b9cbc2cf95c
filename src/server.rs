use crate::error::RepoProxyError;
use crate::github::GitHubClient;
use crate::types::{ErrorResponse, RepoListResponse};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 30;
const MAX_PER_PAGE: u32 = 100;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GitHubClient>,
}

/// Raw query parameters. Kept as strings so malformed numbers produce our
/// own 400 body instead of the extractor's rejection.
#[derive(Debug, Deserialize)]
pub struct RepoQuery {
    pub username: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Validated query parameters.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub username: String,
    pub page: u32,
    pub per_page: u32,
}

/// Validate request parameters. Runs before any upstream contact; a failure
/// here means no network call is made.
pub fn validate_query(params: &RepoQuery) -> Result<ValidatedQuery, ErrorResponse> {
    let username = match &params.username {
        None => {
            return Err(bad_request("Username parameter is required"));
        }
        Some(u) => {
            let trimmed = u.trim();
            if trimmed.is_empty() {
                return Err(bad_request("Invalid username format"));
            }
            trimmed.to_string()
        }
    };

    let page = match &params.page {
        None => DEFAULT_PAGE,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(bad_request("Invalid page parameter")),
        },
    };

    let per_page = match &params.per_page {
        None => DEFAULT_PER_PAGE,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if (1..=MAX_PER_PAGE).contains(&n) => n,
            _ => {
                return Err(bad_request(
                    "Invalid per_page parameter (must be 1-100)",
                ))
            }
        },
    };

    Ok(ValidatedQuery {
        username,
        page,
        per_page,
    })
}

fn bad_request(message: &str) -> ErrorResponse {
    ErrorResponse {
        error: message.to_string(),
        kind: Some("invalid_parameter".to_string()),
    }
}

/// Map a proxy error to the client-facing status and body.
fn error_response(err: &RepoProxyError) -> (StatusCode, ErrorResponse) {
    let kind = Some(err.kind().to_string());
    match err {
        RepoProxyError::InvalidParameter(message) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                error: message.clone(),
                kind,
            },
        ),
        RepoProxyError::UserNotFound(_) => (
            StatusCode::NOT_FOUND,
            ErrorResponse {
                error: "User not found".to_string(),
                kind,
            },
        ),
        RepoProxyError::RateLimitExceeded(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse {
                error: "Rate limit exceeded. Please try again later.".to_string(),
                kind,
            },
        ),
        RepoProxyError::UpstreamFailure { status, .. } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            ErrorResponse {
                error: "Failed to fetch repositories".to_string(),
                kind,
            },
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse {
                error: "Internal server error".to_string(),
                kind,
            },
        ),
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/github", get(list_repositories))
        .route("/health", get(liveness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Proxy handler: validate, forward one upstream request, normalize the
/// envelope.
async fn list_repositories(
    State(state): State<AppState>,
    Query(params): Query<RepoQuery>,
) -> impl IntoResponse {
    let query = match validate_query(&params) {
        Ok(q) => q,
        Err(body) => return (StatusCode::BAD_REQUEST, Json(body)).into_response(),
    };

    match state
        .github
        .list_user_repos(&query.username, query.page, query.per_page)
        .await
    {
        Ok((repositories, has_more)) => {
            let response = RepoListResponse {
                count: repositories.len(),
                repositories,
                page: query.page,
                per_page: query.per_page,
                has_more,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            error!(username = %query.username, page = query.page, "GitHub API error: {}", err);
            let (status, body) = error_response(&err);
            (status, Json(body)).into_response()
        }
    }
}

async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "alive" })))
}

/// Bind and serve the API until shutdown completes.
pub async fn run_server(
    state: AppState,
    port: u16,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> crate::error::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Repository proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
