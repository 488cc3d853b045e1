//! Configuration for the DOI to BibTeX MCP server.

use std::time::Duration;

/// Registry configuration constants.
pub mod registry {
    use std::time::Duration;

    /// DOI resolver used for content negotiation.
    pub const RESOLVER_URL: &str = "https://doi.org";

    /// Media type requested from the registration agency.
    pub const BIBTEX_MEDIA_TYPE: &str = "application/x-bibtex";

    /// Request timeout, covering the whole redirect chain.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Maximum redirect hops (doi.org -> agency -> exporter).
    pub const MAX_REDIRECTS: usize = 5;

    /// Maximum idle connections kept per host.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Environment variable holding the optional access secret.
pub const AUTH_TOKEN_ENV: &str = "AUTH_TOKEN";

/// Server configuration.
#[derive(Clone)]
pub struct Config {
    /// Access secret for the HTTP transport (optional).
    pub auth_token: Option<String>,

    /// Base URL of the DOI resolver (overridden in tests with mock servers).
    pub resolver_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Maximum redirects followed before giving up.
    pub max_redirects: usize,
}

impl Config {
    /// Create a new configuration with an optional access secret.
    ///
    /// An empty secret is treated as absent, which leaves the HTTP transport open.
    #[must_use]
    pub fn new(auth_token: Option<String>) -> Self {
        Self {
            auth_token: auth_token.filter(|t| !t.is_empty()),
            resolver_url: registry::RESOLVER_URL.to_string(),
            request_timeout: registry::REQUEST_TIMEOUT,
            connect_timeout: registry::CONNECT_TIMEOUT,
            max_redirects: registry::MAX_REDIRECTS,
        }
    }

    /// Create a test configuration pointing at a mock resolver.
    #[must_use]
    pub fn for_testing(resolver_url: &str) -> Self {
        Self {
            auth_token: None,
            resolver_url: resolver_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_redirects: registry::MAX_REDIRECTS,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(std::env::var(AUTH_TOKEN_ENV).ok());

        if let Ok(url) = std::env::var("DOI_RESOLVER_URL") {
            config = config.with_resolver_url(url);
        }

        if let Ok(secs) = std::env::var("DOI_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| anyhow::anyhow!("DOI_TIMEOUT_SECS must be a number of seconds: {e}"))?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Override the resolver base URL.
    #[must_use]
    pub fn with_resolver_url(mut self, url: impl Into<String>) -> Self {
        self.resolver_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check if an access secret is configured.
    #[must_use]
    pub const fn has_auth_token(&self) -> bool {
        self.auth_token.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("has_auth_token", &self.has_auth_token())
            .field("resolver_url", &self.resolver_url)
            .field("request_timeout", &self.request_timeout)
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}
