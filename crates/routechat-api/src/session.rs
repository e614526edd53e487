use axum::http::{header::COOKIE, HeaderMap};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use routechat_session::SessionState;

pub const SESSION_COOKIE: &str = "routechat_session";

#[derive(Debug, Clone)]
struct SessionEntry {
    state: SessionState,
    last_seen: DateTime<Utc>,
}

/// Server-side conversation state, keyed by the session cookie.
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
    idle_ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_ttl: chrono::Duration::from_std(idle_ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Session id and state for a request.
    ///
    /// A missing, malformed, unknown or expired cookie yields a fresh id and
    /// an empty state; the bool is true when the id is new.
    pub fn resolve(&self, headers: &HeaderMap) -> (Uuid, SessionState, bool) {
        if let Some(id) = session_id_from_headers(headers) {
            if let Some(state) = self.load(id) {
                return (id, state, false);
            }
        }
        (Uuid::new_v4(), SessionState::new(), true)
    }

    pub fn load(&self, id: Uuid) -> Option<SessionState> {
        let now = Utc::now();
        let mut entry = self.sessions.get_mut(&id)?;
        if self.is_expired(&entry, now) {
            drop(entry);
            self.sessions.remove(&id);
            return None;
        }
        entry.last_seen = now;
        Some(entry.state.clone())
    }

    pub fn save(&self, id: Uuid, state: SessionState) {
        self.sessions.insert(
            id,
            SessionEntry {
                state,
                last_seen: Utc::now(),
            },
        );
    }

    /// Forget a session. Returns whether it existed.
    pub fn flush(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !self.is_expired(entry, now));
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Periodically drop idle sessions until `shutdown` fires.
    pub fn spawn_reaper(self: Arc<Self>, every: Duration, shutdown: CancellationToken) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = interval.tick() => {
                        let removed = self.prune_expired();
                        if removed > 0 {
                            tracing::debug!(removed, remaining = self.len(), "Pruned idle sessions");
                        }
                    }
                }
            }
        });
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.last_seen) > self.idle_ttl
    }
}

/// Session id carried in the request's cookies, if any parses.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

pub fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_parse_cookie() {
        let id = Uuid::new_v4();
        let headers = headers_with(&format!("theme=dark; {}={}", SESSION_COOKIE, id));
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_malformed_cookie_ignored() {
        let headers = headers_with(&format!("{}=not-a-uuid", SESSION_COOKIE));
        assert_eq!(session_id_from_headers(&headers), None);
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_unknown_session_gets_new_id() {
        let store = SessionStore::new(Duration::from_secs(60));
        let stale = Uuid::new_v4();
        let (id, state, issued) = store.resolve(&headers_with(&session_cookie(stale)));

        assert!(issued);
        assert_ne!(id, stale);
        assert!(!state.has_thread());
    }

    #[test]
    fn test_known_session_reused() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = Uuid::new_v4();
        store.save(id, SessionState::with_thread("thread_1"));

        let (resolved, state, issued) = store.resolve(&headers_with(&format!("{}={}", SESSION_COOKIE, id)));
        assert_eq!(resolved, id);
        assert!(!issued);
        assert_eq!(state.thread_id(), Some("thread_1"));
    }

    #[test]
    fn test_flush() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = Uuid::new_v4();
        store.save(id, SessionState::with_thread("thread_1"));

        assert!(store.flush(id));
        assert!(!store.flush(id));
        assert!(store.load(id).is_none());
    }

    #[test]
    fn test_expired_sessions_pruned() {
        let store = SessionStore::new(Duration::ZERO);
        store.save(Uuid::new_v4(), SessionState::new());
        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(store.prune_expired(), 1);
        assert!(store.is_empty());
    }
}
