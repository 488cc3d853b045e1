//! Map registry responses and transport failures to conversion outcomes.

use std::time::Duration;

use reqwest::StatusCode;

use crate::doi::Doi;
use crate::error::ConvertError;

/// Classify a final (post-redirect) registry response.
///
/// Only a 200 with a non-blank body is a success; the body is returned verbatim.
pub fn classify_response(doi: &Doi, status: StatusCode, body: String) -> Result<String, ConvertError> {
    let supplied = doi.original().to_string();

    match status.as_u16() {
        200 if body.trim().is_empty() => {
            Err(ConvertError::upstream_failure(supplied, "registry returned an empty response"))
        }
        200 => Ok(body),
        404 => Err(ConvertError::not_found(supplied)),
        406 => Err(ConvertError::UnsupportedFormat { doi: supplied }),
        400..=499 => Err(ConvertError::BadRequest { doi: supplied, status: status.as_u16() }),
        500..=599 => Err(ConvertError::upstream_failure(
            supplied,
            format!("HTTP {status}, safe to retry later"),
        )),
        300..=399 => Err(ConvertError::upstream_failure(
            supplied,
            format!("redirect without a usable target (HTTP {status})"),
        )),
        _ => Err(ConvertError::upstream_failure(supplied, format!("unexpected HTTP {status}"))),
    }
}

/// Classify a transport-level failure from reqwest.
///
/// Timeouts are checked first: a connect timeout is still a timeout.
pub fn classify_transport_error(doi: &Doi, err: &reqwest::Error, timeout: Duration) -> ConvertError {
    let supplied = doi.original().to_string();

    if err.is_timeout() {
        ConvertError::UpstreamTimeout { doi: supplied, timeout }
    } else if err.is_redirect() {
        ConvertError::upstream_failure(supplied, "too many redirects or redirect loop")
    } else {
        ConvertError::UpstreamUnreachable { doi: supplied, reason: describe(err) }
    }
}

/// Innermost error message, which names the actual DNS/TLS/connect cause.
fn describe(err: &reqwest::Error) -> String {
    let mut source: &dyn std::error::Error = err;
    while let Some(inner) = source.source() {
        source = inner;
    }
    source.to_string()
}
