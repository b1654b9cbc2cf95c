use clap::Parser;
use colored::*;
use github_repos_server::cli::Cli;
use github_repos_server::error::Result;
use github_repos_server::github::GitHubClient;
use github_repos_server::server::{run_server, AppState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("{}", "GitHub Repository Proxy Server".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    if cli.github_token.is_none() {
        println!(
            "{}",
            "No GITHUB_TOKEN set - running unauthenticated (60 requests/hour)".yellow()
        );
    }

    let github = Arc::new(GitHubClient::with_base_url(
        &cli.github_api_url,
        cli.github_token.clone(),
    )?);

    let state = AppState { github };

    println!("✅ Serving /api/github on port {}", cli.port);
    println!("\nPress Ctrl+C to stop the server\n");

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        println!("\n🛑 Shutting down server...");
    };

    run_server(state, cli.port, shutdown).await?;

    println!("✅ Server stopped");

    Ok(())
}
