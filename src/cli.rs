use clap::Parser;

#[derive(Parser)]
#[command(name = "github-repos-server")]
#[command(about = "GitHub Repository Proxy Server - Serves paginated repository listings for a username")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Port for the HTTP API
    #[arg(long, env = "PORT", default_value = "3001")]
    pub port: u16,

    /// GitHub API token (optional; unauthenticated requests are rate limited harder)
    #[arg(long, env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,
}
