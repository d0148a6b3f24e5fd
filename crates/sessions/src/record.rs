//! Poolable server session records.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque server-assigned session identifier.
///
/// Attached to outgoing operations as `{ "id": <uuid> }`.  The identifier is
/// a distinct type rather than a raw byte string so downstream serialization
/// always recognizes it as an opaque token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId {
    pub id: Uuid,
}

impl SessionId {
    fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A server session: an opaque identifier plus the last time it was handed
/// to a caller.  Held by exactly one [`ClientSession`] at a time, otherwise
/// pooled.
///
/// [`ClientSession`]: crate::handle::ClientSession
#[derive(Debug)]
pub struct ServerSession {
    id: SessionId,
    pub(crate) last_used: Instant,
    created_at: DateTime<Utc>,
}

impl ServerSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            last_used: Instant::now(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Wall-clock time this record was minted.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the server may be about to expire this session.
    ///
    /// The deployment expires sessions idle for `timeout_minutes`; the record
    /// counts as timed out once less than a minute of that budget remains, so
    /// an identifier the server is concurrently discarding is never handed
    /// out.  Idle time is recomputed against the monotonic clock on every
    /// call.
    pub fn is_timed_out(&self, timeout_minutes: u32) -> bool {
        let margin_secs = (i64::from(timeout_minutes) - 1) * 60;
        if margin_secs < 0 {
            return true;
        }
        self.last_used.elapsed() > Duration::from_secs(margin_secs as u64)
    }

    /// Refresh recency and return the identifier for outbound annotation.
    pub fn mark_used(&mut self) -> SessionId {
        self.last_used = Instant::now();
        self.id
    }
}

impl Default for ServerSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backdated(idle_secs: u64) -> ServerSession {
        let mut session = ServerSession::new();
        session.last_used = Instant::now() - Duration::from_secs(idle_secs);
        session
    }

    #[test]
    fn fresh_record_is_not_timed_out() {
        let session = ServerSession::new();
        assert!(!session.is_timed_out(30));
    }

    #[test]
    fn idle_within_margin_is_not_timed_out() {
        // Timeout 2 minutes leaves a 60 second margin.
        let session = backdated(59);
        assert!(!session.is_timed_out(2));
    }

    #[test]
    fn idle_past_margin_is_timed_out() {
        let session = backdated(61);
        assert!(session.is_timed_out(2));
    }

    #[test]
    fn zero_timeout_is_always_timed_out() {
        let session = ServerSession::new();
        assert!(session.is_timed_out(0));
    }

    #[test]
    fn mark_used_refreshes_recency() {
        let mut session = backdated(61);
        assert!(session.is_timed_out(2));

        let id = session.mark_used();
        assert_eq!(id, session.id());
        assert!(!session.is_timed_out(2));
    }

    #[test]
    fn identity_is_stable_across_use() {
        let mut session = ServerSession::new();
        let id = session.id();
        let created = session.created_at();

        session.mark_used();
        assert_eq!(session.id(), id);
        assert_eq!(session.created_at(), created);
    }

    #[test]
    fn identifiers_are_unique() {
        assert_ne!(ServerSession::new().id(), ServerSession::new().id());
    }

    #[test]
    fn id_serializes_as_tagged_document() {
        let session = ServerSession::new();
        let json = serde_json::to_value(session.id()).unwrap();
        assert!(json.get("id").is_some());
    }
}
