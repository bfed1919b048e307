//! Server-side session registry
//!
//! A session is created at sign-in and destroyed at sign-out. Access tokens
//! only carry the session id, so removing the entry here revokes the token
//! even before it expires.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Identity carried into every operation that needs to know who is acting.
#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(account_id: Uuid, email: String, is_admin: bool, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            account_id,
            email,
            is_admin,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionContext>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new session. Expired entries left behind by users who
    /// never came back are dropped at the same time.
    pub fn insert(&self, session: SessionContext) {
        self.purge_expired();
        debug!("Session opened: {}", session.session_id);
        self.sessions.insert(session.session_id, session);
    }

    /// Drops every expired session, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired());
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            debug!("Purged {} expired sessions", purged);
        }
        purged
    }

    /// Returns the live session, dropping it if it has expired.
    pub fn get(&self, session_id: &Uuid) -> Option<SessionContext> {
        let session = self.sessions.get(session_id).map(|s| s.clone())?;
        if session.is_expired() {
            self.sessions.remove(session_id);
            return None;
        }
        Some(session)
    }

    pub fn remove(&self, session_id: &Uuid) -> Option<SessionContext> {
        debug!("Session closed: {}", session_id);
        self.sessions.remove(session_id).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let store = SessionStore::new();
        let session = SessionContext::new(Uuid::new_v4(), "ana@x.com".into(), false, 3600);
        let id = session.session_id;

        store.insert(session);
        assert_eq!(store.get(&id).map(|s| s.email), Some("ana@x.com".to_string()));

        assert!(store.remove(&id).is_some());
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_expired_session_is_evicted() {
        let store = SessionStore::new();
        let session = SessionContext::new(Uuid::new_v4(), "ana@x.com".into(), false, -1);
        let id = session.session_id;

        store.insert(session);
        assert!(store.get(&id).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_abandoned_sessions_do_not_accumulate() {
        let store = SessionStore::new();
        for _ in 0..1000 {
            store.insert(SessionContext::new(Uuid::new_v4(), "gone@x.com".into(), false, -1));
        }
        let live = SessionContext::new(Uuid::new_v4(), "ana@x.com".into(), false, 3600);
        let live_id = live.session_id;
        store.insert(live);

        assert!(store.get(&live_id).is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_purge_expired_keeps_live_sessions() {
        let store = SessionStore::new();
        let live = SessionContext::new(Uuid::new_v4(), "ana@x.com".into(), false, 3600);
        let live_id = live.session_id;
        store.insert(live);
        // Bypass insert so nothing is purged on the way in.
        let stale = SessionContext::new(Uuid::new_v4(), "bia@x.com".into(), false, -1);
        store.sessions.insert(stale.session_id, stale);

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&live_id).is_some());
    }
}
