//! SSE sessions for the HTTP transport.
//!
//! A session is opened by `GET /sse` and addressed by `POST /message?sessionId=...`.
//! Responses posted to a session are broadcast to its live stream. The session is
//! closed when the client disconnects and the stream is dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::response::sse::Event;
use tokio::sync::{RwLock, broadcast};

/// Buffered events per live stream before a slow client starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// An SSE event with a per-session sequence number.
#[derive(Clone, Debug)]
pub struct SessionEvent {
    pub id: u64,
    pub kind: &'static str,
    pub data: String,
}

impl SessionEvent {
    /// Convert to an axum SSE event.
    #[must_use]
    pub fn to_sse_event(&self) -> Event {
        Event::default().id(self.id.to_string()).event(self.kind).data(&self.data)
    }
}

/// One connected SSE client.
pub struct Session {
    pub id: String,
    tx: broadcast::Sender<SessionEvent>,
    next_event_id: AtomicU64,
}

impl Session {
    fn new(id: String) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { id, tx, next_event_id: AtomicU64::new(1) }
    }

    /// Deliver an event to the live stream.
    ///
    /// Returns `None` when no stream is subscribed.
    pub fn push(&self, kind: &'static str, data: impl Into<String>) -> Option<u64> {
        let id = self.next_event_id.fetch_add(1, Ordering::SeqCst);
        let event = SessionEvent { id, kind, data: data.into() };
        self.tx.send(event).ok().map(|_| id)
    }

    /// Subscribe to live events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("next_event_id", &self.next_event_id.load(Ordering::SeqCst))
            .finish()
    }
}

/// All open SSE sessions.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Arc<Session>>>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new session.
    pub async fn create(&self) -> Arc<Session> {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(id.clone()));
        self.sessions.write().await.insert(id, Arc::clone(&session));

        tracing::info!(session_id = %session.id, "Opened SSE session");
        session
    }

    /// Look up an open session.
    pub async fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Close a session.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "Closed SSE session");
        }
        removed
    }

    /// Number of open sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are open.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry").finish()
    }
}

/// Removes its session when the SSE stream holding it is dropped.
pub struct SessionGuard {
    registry: SessionRegistry,
    id: String,
}

impl SessionGuard {
    #[must_use]
    pub fn new(registry: SessionRegistry, id: String) -> Self {
        Self { registry, id }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let registry = self.registry.clone();
        let id = std::mem::take(&mut self.id);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                registry.remove(&id).await;
            });
        }
    }
}
