//! HTTP transport for the MCP server.
//!
//! Routes:
//! - `GET /`, `GET /health`, `GET /ready`: open health probes
//! - `GET /sse`: SSE stream; announces the message endpoint, then carries responses
//! - `POST /message?sessionId=...`: JSON-RPC in, response on the session's stream
//! - `POST /mcp`: JSON-RPC in, response inline
//!
//! Every MCP route sits behind the [`AccessGate`].

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth::{self, AccessGate};
use super::protocol::{Dispatcher, JsonRpcRequest, JsonRpcResponse, SERVER_NAME};
use super::session::{SessionGuard, SessionRegistry};

/// Interval between SSE keep-alive comments.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Query parameters for the message endpoint.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub dispatcher: Arc<Dispatcher>,
    pub sessions: SessionRegistry,
    /// Absolute base for endpoint announcements; relative paths when absent.
    pub base_url: Option<String>,
}

impl HttpState {
    fn message_endpoint(&self, session_id: &str) -> String {
        let base = self.base_url.as_deref().unwrap_or("").trim_end_matches('/');
        format!("{base}/message?sessionId={session_id}")
    }
}

/// Create the HTTP router for MCP.
pub fn create_router(
    dispatcher: Arc<Dispatcher>,
    gate: AccessGate,
    base_url: Option<String>,
) -> Router {
    let state = Arc::new(HttpState { dispatcher, sessions: SessionRegistry::new(), base_url });

    let gated = Router::new()
        .route("/sse", get(handle_sse))
        .route("/message", post(handle_message))
        .route("/mcp", post(handle_mcp))
        .route_layer(middleware::from_fn_with_state(gate, auth::require_bearer));

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .merge(gated)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn readiness_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.len().await,
        "tools": state.dispatcher.tool_count()
    }))
}

/// Parse a JSON-RPC body, or produce the parse-error response.
fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, JsonRpcResponse> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Unparseable JSON-RPC body");
        JsonRpcResponse::parse_error(&e)
    })
}

/// Handle POST requests to /mcp: response returned inline.
async fn handle_mcp(State(state): State<Arc<HttpState>>, body: Bytes) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return (StatusCode::BAD_REQUEST, Json(response)).into_response(),
    };

    match state.dispatcher.handle(request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Handle POST requests to /message.
///
/// With a live session the response goes out on its SSE stream; without one it is
/// returned inline. Unparseable bodies get a 400 with the parse error, as on `/mcp`.
async fn handle_message(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let session = match query.session_id.as_deref() {
        Some(id) => match state.sessions.get(id).await {
            Some(session) => Some(session),
            None => {
                tracing::warn!(session_id = %id, "Message for unknown session");
                return (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "Unknown session" })))
                    .into_response();
            }
        },
        None => None,
    };

    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return (StatusCode::BAD_REQUEST, Json(response)).into_response(),
    };

    match (session, state.dispatcher.handle(request).await) {
        (Some(session), Some(response)) => {
            match serde_json::to_string(&response) {
                Ok(data) => {
                    if session.push("message", data).is_none() {
                        tracing::warn!(session_id = %session.id, "SSE stream gone, response dropped");
                    }
                }
                Err(e) => tracing::error!(error = %e, "Failed to serialize response"),
            }
            StatusCode::ACCEPTED.into_response()
        }
        (None, Some(response)) => Json(response).into_response(),
        (_, None) => StatusCode::ACCEPTED.into_response(),
    }
}

/// Handle GET requests to /sse: open a session and stream its responses.
async fn handle_sse(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let session = state.sessions.create().await;
    let endpoint = state.message_endpoint(&session.id);

    tracing::info!(session_id = %session.id, endpoint = %endpoint, "New SSE connection");

    let guard = SessionGuard::new(state.sessions.clone(), session.id.clone());
    let announce = stream::once(async move { Event::default().event("endpoint").data(endpoint) });
    let live = BroadcastStream::new(session.subscribe()).filter_map(|result| async move {
        match result {
            Ok(event) => Some(event.to_sse_event()),
            Err(e) => {
                tracing::warn!(error = %e, "SSE client lagging, events skipped");
                None
            }
        }
    });

    let events = announce.chain(live).map(move |event| {
        let _open = &guard;
        Ok::<_, Infallible>(event)
    });

    (
        [("X-Accel-Buffering", "no"), ("Cache-Control", "no-cache, no-store, must-revalidate")],
        Sse::new(events).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL).text("ping")),
    )
}
