//! Error types for the DOI to BibTeX MCP server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Every conversion failure renders as a single line, since the caller is usually a
//! language model relaying the message to a human.

use std::time::Duration;

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Errors from converting a DOI to BibTeX.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Input is not a DOI in any accepted form. Detected locally, never reaches the network.
    #[error("Invalid DOI {input:?}: expected a DOI like '10.1234/example'")]
    InvalidDoi {
        /// The input exactly as supplied
        input: String,
    },

    /// The registry has no record of the DOI (404 response)
    #[error("DOI not found: {doi} is not registered")]
    DoiNotFound {
        /// DOI as supplied by the caller
        doi: String,
    },

    /// The registration agency cannot export BibTeX (406 response)
    #[error("BibTeX format not available for DOI: {doi}")]
    UnsupportedFormat {
        /// DOI as supplied by the caller
        doi: String,
    },

    /// The registry rejected the request (other 4xx response)
    #[error("Registry rejected DOI {doi} as malformed (HTTP {status})")]
    BadRequest {
        /// DOI as supplied by the caller
        doi: String,
        /// HTTP status code
        status: u16,
    },

    /// Registry-side failure: 5xx, empty body, or an unresolvable redirect chain
    #[error("Registry failed to resolve DOI {doi}: {reason}")]
    UpstreamFailure {
        /// DOI as supplied by the caller
        doi: String,
        /// What went wrong upstream
        reason: String,
    },

    /// The registry did not answer in time
    #[error("Registry timed out after {timeout:?} resolving DOI {doi}")]
    UpstreamTimeout {
        /// DOI as supplied by the caller
        doi: String,
        /// Configured request timeout
        timeout: Duration,
    },

    /// DNS, connection or TLS failure
    #[error("Registry unreachable while resolving DOI {doi}: {reason}")]
    UpstreamUnreachable {
        /// DOI as supplied by the caller
        doi: String,
        /// Transport error description
        reason: String,
    },
}

impl ConvertError {
    /// Create an invalid DOI error.
    #[must_use]
    pub fn invalid_doi(input: impl Into<String>) -> Self {
        Self::InvalidDoi { input: input.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(doi: impl Into<String>) -> Self {
        Self::DoiNotFound { doi: doi.into() }
    }

    /// Create an upstream failure error.
    #[must_use]
    pub fn upstream_failure(doi: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpstreamFailure { doi: doi.into(), reason: reason.into() }
    }

    /// Short machine-friendly category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidDoi { .. } => "invalid-doi",
            Self::DoiNotFound { .. } => "not-found",
            Self::UnsupportedFormat { .. } => "unsupported-format",
            Self::BadRequest { .. } => "bad-request",
            Self::UpstreamFailure { .. } => "upstream-failure",
            Self::UpstreamTimeout { .. } => "upstream-timeout",
            Self::UpstreamUnreachable { .. } => "upstream-unreachable",
        }
    }

    /// Returns true if a later retry could succeed without changing the DOI.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamFailure { .. }
                | Self::UpstreamTimeout { .. }
                | Self::UpstreamUnreachable { .. }
        )
    }

    /// Convert to the single-line message returned as the tool result.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        let message = format!("Error ({}): {self}", self.category());
        // Upstream reasons come from reqwest and may span lines.
        message.lines().map(str::trim).collect::<Vec<_>>().join(" ")
    }
}

/// Errors from MCP tool dispatch (protocol misuse, not conversion failures).
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No tool registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Convert to a user-friendly error message for the JSON-RPC error.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            _ => self.to_string(),
        }
    }
}

/// Rejection raised by the HTTP access gate.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Request carried no bearer credential
    #[error("Unauthorized: missing bearer token")]
    MissingCredential,

    /// Request carried a bearer credential that does not match
    #[error("Unauthorized: invalid bearer token")]
    InvalidCredential,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Bearer")],
            Json(serde_json::json!({ "error": "Unauthorized" })),
        )
            .into_response()
    }
}

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
