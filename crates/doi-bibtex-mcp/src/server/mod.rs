//! MCP server implementation.
//!
//! Provides both stdio (for desktop clients) and HTTP/SSE transports. Both share a
//! single [`Dispatcher`], so the conversion logic lives in exactly one place.

pub mod auth;
pub mod protocol;
pub mod session;
pub mod stdio;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

pub use auth::AccessGate;
pub use protocol::Dispatcher;

use crate::client::DoiClient;
use crate::tools::ToolContext;

/// MCP server for DOI to BibTeX conversion.
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
}

impl McpServer {
    /// Create a new MCP server.
    #[must_use]
    pub fn new(client: DoiClient) -> Self {
        let ctx = ToolContext::new(Arc::new(client));
        Self { dispatcher: Arc::new(Dispatcher::new(ctx)) }
    }

    /// Run the server in stdio mode.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        tracing::info!("Starting MCP server in stdio mode");
        tracing::info!("Registered {} tools", self.dispatcher.tool_count());

        stdio::run_stdio(&self.dispatcher).await
    }

    /// Run the server in HTTP mode.
    ///
    /// # Errors
    ///
    /// Returns error on server failure.
    pub async fn run_http(
        self,
        port: u16,
        gate: AccessGate,
        base_url: Option<String>,
    ) -> anyhow::Result<()> {
        tracing::info!("Starting MCP server in HTTP mode on port {}", port);
        tracing::info!("Registered {} tools", self.dispatcher.tool_count());

        if gate.is_enabled() {
            tracing::info!("Authentication enabled");
        } else {
            tracing::warn!("No AUTH_TOKEN set - authentication disabled");
        }

        let router = transport::create_router(self.dispatcher, gate, base_url);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server listening on http://{}", addr);

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for McpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpServer").field("tools", &self.dispatcher.tool_count()).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
