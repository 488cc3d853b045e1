//! DOI to BibTeX MCP Server - Entry Point
//!
//! Provides both stdio (for desktop clients) and HTTP transports.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use doi_bibtex_mcp::{
    config::{Config, registry},
    server::{AccessGate, McpServer},
    DoiClient,
};

#[derive(Parser, Debug)]
#[command(name = "doi-bibtex-mcp")]
#[command(about = "MCP server converting DOIs to BibTeX via doi.org content negotiation")]
#[command(version)]
struct Cli {
    /// Transport mode: stdio or http
    #[arg(long, default_value = "stdio")]
    transport: Transport,

    /// HTTP server port (only used with --transport http)
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Base URL for SSE endpoint announcements (e.g., https://doi-bibtex.example.com)
    #[arg(long, env = "BASE_URL")]
    base_url: Option<String>,

    /// Bearer token required by the HTTP transport (unset or empty disables the check)
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// DOI resolver used for content negotiation
    #[arg(long, default_value = registry::RESOLVER_URL, env = "DOI_RESOLVER_URL")]
    resolver_url: String,

    /// Registry request timeout in seconds
    #[arg(long, default_value = "15", env = "DOI_TIMEOUT_SECS")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// HTTP with Server-Sent Events
    Http,
}

/// Logs always go to stderr: stdout carries the stdio transport.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        "Starting DOI to BibTeX MCP server"
    );

    let config = Config::new(cli.auth_token)
        .with_resolver_url(cli.resolver_url)
        .with_request_timeout(Duration::from_secs(cli.timeout_secs));

    tracing::debug!(config = ?config, "Loaded configuration");

    let client = DoiClient::new(&config)?;
    tracing::info!(resolver = %client.resolver(), "Registry client ready");
    let server = McpServer::new(client);

    match cli.transport {
        Transport::Stdio => {
            tracing::info!("Running in stdio mode");
            server.run_stdio().await?;
        }
        Transport::Http => {
            tracing::info!(port = cli.port, base_url = ?cli.base_url, "Running in HTTP mode");
            let gate = AccessGate::new(config.auth_token.clone());
            server.run_http(cli.port, gate, cli.base_url).await?;
        }
    }

    Ok(())
}
