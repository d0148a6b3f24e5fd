use serde::Serialize;

/// Structured trace events emitted across all Skerry crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    SessionCheckedOut {
        session_id: String,
        /// `true` when the pool was empty (or held only stale records) and a
        /// fresh server session was minted instead of reused.
        minted: bool,
    },
    SessionReturned {
        session_id: String,
        /// `true` when the record came back already stale and was discarded
        /// instead of re-entering the pool.
        discarded: bool,
    },
    SessionReclaimed {
        session_id: String,
    },
    StaleSessionsSwept {
        swept: usize,
        remaining: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::debug!(trace_event = %json, "skerry_event");
    }
}
