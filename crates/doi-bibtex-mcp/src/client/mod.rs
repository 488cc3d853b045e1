//! DOI registry client.
//!
//! Provides async HTTP client with:
//! - Content negotiation (`Accept: application/x-bibtex`) against doi.org
//! - Bounded redirect following (doi.org hands off to Crossref, DataCite, ...)
//! - A single request timeout covering the whole redirect chain
//! - Connection pooling via reqwest, shared across concurrent tool calls
//!
//! There are no retries: every call is a single attempt.

mod classify;

pub use classify::{classify_response, classify_transport_error};

use std::time::Duration;

use reqwest::{Client, header, redirect};
use url::Url;

use crate::config::{Config, registry};
use crate::doi::Doi;
use crate::error::ConvertResult;

/// DOI content-negotiation client.
#[derive(Clone)]
pub struct DoiClient {
    /// Pooled HTTP client.
    client: Client,

    /// Resolver base URL.
    resolver: Url,

    /// Request timeout, reported in timeout errors.
    request_timeout: Duration,
}

impl DoiClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the resolver URL is invalid or HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let resolver = Url::parse(&config.resolver_url)?;
        if resolver.cannot_be_a_base() {
            anyhow::bail!("resolver URL cannot be used as a base: {}", config.resolver_url);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(registry::BIBTEX_MEDIA_TYPE));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .redirect(redirect::Policy::limited(config.max_redirects))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(registry::MAX_KEEPALIVE)
            .pool_idle_timeout(registry::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        Ok(Self { client, resolver, request_timeout: config.request_timeout })
    }

    /// Resolver base URL.
    #[must_use]
    pub fn resolver(&self) -> &Url {
        &self.resolver
    }

    /// Build the outbound URL for a DOI.
    ///
    /// Each `/`-separated segment is percent-encoded, so `?`, `#` and `%` inside a
    /// suffix reach the registry as part of the DOI.
    #[must_use]
    pub fn resolve_url(&self, doi: &Doi) -> Url {
        let mut url = self.resolver.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(doi.as_str().split('/'));
        }
        url
    }

    /// Fetch the BibTeX record for a DOI.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ConvertError`](crate::error::ConvertError) for any
    /// non-200 outcome, timeout or transport failure.
    pub async fn fetch_bibtex(&self, doi: &Doi) -> ConvertResult<String> {
        let url = self.resolve_url(doi);

        tracing::debug!(doi = %doi, url = %url, "Fetching BibTeX");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport_error(doi, &e, self.request_timeout))?;

        let status = response.status();
        let final_url = response.url().clone();

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(doi, &e, self.request_timeout))?;

        tracing::debug!(doi = %doi, status = status.as_u16(), final_url = %final_url, bytes = body.len(), "Registry responded");

        classify_response(doi, status, body)
    }
}

impl std::fmt::Debug for DoiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoiClient").field("resolver", &self.resolver.as_str()).finish()
    }
}
