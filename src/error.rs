use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoProxyError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("GitHub API request failed with status {status}: {message}")]
    UpstreamFailure { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RepoProxyError {
    /// Stable machine-readable code for error bodies, independent of the
    /// human-readable message.
    pub fn kind(&self) -> &'static str {
        match self {
            RepoProxyError::InvalidParameter(_) => "invalid_parameter",
            RepoProxyError::UserNotFound(_) => "not_found",
            RepoProxyError::RateLimitExceeded(_) => "rate_limited",
            RepoProxyError::UpstreamFailure { .. } => "upstream_error",
            RepoProxyError::NetworkError(_)
            | RepoProxyError::JsonError(_)
            | RepoProxyError::IoError(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, RepoProxyError>;
