//! Bearer-token access gate for the HTTP transport.
//!
//! The secret is read once at startup and handed to [`AccessGate::new`]. With no
//! secret every request passes; with one, requests must present
//! `Authorization: Bearer <secret>` or are answered with 401 before any body is read.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::error::AuthError;

/// Static bearer-token check.
#[derive(Clone, Default)]
pub struct AccessGate {
    secret: Option<Arc<str>>,
}

impl AccessGate {
    /// Create a gate. `None` or an empty secret disables it.
    #[must_use]
    pub fn new(secret: Option<String>) -> Self {
        Self { secret: secret.filter(|s| !s.is_empty()).map(Arc::from) }
    }

    /// A gate that lets everything through.
    #[must_use]
    pub fn open() -> Self {
        Self::default()
    }

    /// Whether a secret is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Check request headers against the secret.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let Some(secret) = self.secret.as_deref() else {
            return Ok(());
        };

        match headers.typed_get::<Authorization<Bearer>>() {
            Some(auth) if auth.token() == secret => Ok(()),
            Some(_) => Err(AuthError::InvalidCredential),
            None => Err(AuthError::MissingCredential),
        }
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").field("enabled", &self.is_enabled()).finish()
    }
}

/// Axum middleware enforcing the gate on the routes it wraps.
pub async fn require_bearer(State(gate): State<AccessGate>, req: Request, next: Next) -> Response {
    if let Err(e) = gate.check(req.headers()) {
        tracing::warn!(path = %req.uri().path(), error = %e, "Rejected request");
        return e.into_response();
    }

    next.run(req).await
}
