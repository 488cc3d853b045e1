//! DOI to BibTeX MCP Server
//!
//! A Model Context Protocol (MCP) server exposing one tool, `doi_to_bibtex`, which
//! resolves a DOI through doi.org content negotiation and returns the BibTeX record
//! published by its registration agency (Crossref, DataCite, ...).
//!
//! # Features
//!
//! - **Flexible input**: `10.1234/x`, `doi:10.1234/x`, `https://doi.org/10.1234/x`
//! - **Two transports**: stdio for desktop clients, HTTP/SSE for hosted deployments
//! - **Optional bearer gate**: a static `AUTH_TOKEN` protects the HTTP transport
//! - **Classified failures**: every error is one readable line
//!
//! # Example
//!
//! ```no_run
//! use doi_bibtex_mcp::{client::DoiClient, config::Config, doi::Doi};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = DoiClient::new(&config)?;
//!
//!     let doi: Doi = "https://doi.org/10.1038/nature12373".parse()?;
//!     let bibtex = client.fetch_bibtex(&doi).await?;
//!     println!("{bibtex}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod doi;
pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use client::DoiClient;
pub use config::Config;
pub use doi::Doi;
pub use error::{AuthError, ConvertError, ToolError};
