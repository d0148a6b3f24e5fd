//! Deployment-wide pool of reusable server sessions.
//!
//! Server session identifiers are scarce: the deployment budgets how many
//! may be live at once.  Ended handles therefore return their record here
//! for the next handle to reuse instead of letting it expire.  Records sit
//! in recency order with the most recently returned at the front, which
//! keeps hot records warm and minimizes server-side session churn.

use std::collections::VecDeque;

use parking_lot::Mutex;

use skerry_domain::trace::TraceEvent;

use crate::record::ServerSession;

/// Recency-ordered pool of [`ServerSession`] records.
///
/// All operations take the internal lock; none of them blocks on I/O or
/// fails.  Staleness is pruned lazily on each `acquire`/`release` rather
/// than by a background timer.
#[derive(Default)]
pub struct ServerSessionPool {
    inner: Mutex<VecDeque<ServerSession>>,
}

impl ServerSessionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a server session out of the pool, minting a fresh one when no
    /// pooled record is usable.  The caller owns the returned record until
    /// it comes back through [`release`] or [`release_abandoned`].
    ///
    /// [`release`]: Self::release
    /// [`release_abandoned`]: Self::release_abandoned
    pub fn acquire(&self, timeout_minutes: u32) -> ServerSession {
        let mut pool = self.inner.lock();

        // Records reclaimed from dropped handles re-enter without a sweep,
        // so stale entries can pile up at the back between releases.
        clear_stale(&mut pool, timeout_minutes);

        while let Some(session) = pool.pop_front() {
            if !session.is_timed_out(timeout_minutes) {
                TraceEvent::SessionCheckedOut {
                    session_id: session.id().to_string(),
                    minted: false,
                }
                .emit();
                return session;
            }
        }

        let session = ServerSession::new();
        TraceEvent::SessionCheckedOut {
            session_id: session.id().to_string(),
            minted: true,
        }
        .emit();
        session
    }

    /// Return a server session after an orderly end.  A record that has
    /// itself timed out while checked out is discarded rather than pooled.
    pub fn release(&self, session: ServerSession, timeout_minutes: u32) {
        let mut pool = self.inner.lock();
        clear_stale(&mut pool, timeout_minutes);

        let discarded = session.is_timed_out(timeout_minutes);
        TraceEvent::SessionReturned {
            session_id: session.id().to_string(),
            discarded,
        }
        .emit();
        if !discarded {
            pool.push_front(session);
        }
    }

    /// Return a server session reclaimed from a handle dropped while still
    /// active.  The record goes straight to the front with no sweep and no
    /// staleness check; the next `acquire` or `release` prunes it if it has
    /// expired.  Never fails.
    pub fn release_abandoned(&self, session: ServerSession) {
        let mut pool = self.inner.lock();
        TraceEvent::SessionReclaimed {
            session_id: session.id().to_string(),
        }
        .emit();
        pool.push_front(session);
    }

    /// Number of pooled records, stale entries included.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Drop timed-out records from the back of the pool.
///
/// Records return to the front, so the first non-stale record seen from the
/// back bounds the sweep: everything in front of it is fresher.
fn clear_stale(pool: &mut VecDeque<ServerSession>, timeout_minutes: u32) {
    let before = pool.len();
    while let Some(last) = pool.back() {
        if !last.is_timed_out(timeout_minutes) {
            break;
        }
        pool.pop_back();
    }

    let swept = before - pool.len();
    if swept > 0 {
        TraceEvent::StaleSessionsSwept {
            swept,
            remaining: pool.len(),
        }
        .emit();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    const TIMEOUT_MINUTES: u32 = 2;

    fn stale() -> ServerSession {
        // Idle for the full two minutes, well past the one minute margin.
        let mut session = ServerSession::new();
        session.last_used = Instant::now() - Duration::from_secs(120);
        session
    }

    #[test]
    fn acquire_on_empty_pool_mints() {
        let pool = ServerSessionPool::new();
        let session = pool.acquire(TIMEOUT_MINUTES);
        assert!(!session.is_timed_out(TIMEOUT_MINUTES));
        assert!(pool.is_empty());
    }

    #[test]
    fn most_recently_returned_is_acquired_first() {
        let pool = ServerSessionPool::new();
        let (r1, r2, r3) = (
            ServerSession::new(),
            ServerSession::new(),
            ServerSession::new(),
        );
        let (id1, id2, id3) = (r1.id(), r2.id(), r3.id());

        pool.release(r1, TIMEOUT_MINUTES);
        pool.release(r2, TIMEOUT_MINUTES);
        pool.release(r3, TIMEOUT_MINUTES);

        assert_eq!(pool.acquire(TIMEOUT_MINUTES).id(), id3);
        assert_eq!(pool.acquire(TIMEOUT_MINUTES).id(), id2);
        assert_eq!(pool.acquire(TIMEOUT_MINUTES).id(), id1);
    }

    #[test]
    fn acquire_sweeps_trailing_stale_records() {
        let pool = ServerSessionPool::new();
        let front = ServerSession::new();
        let front_id = front.id();

        // Front to back: fresh, fresh, stale, stale.
        {
            let mut inner = pool.inner.lock();
            inner.push_back(front);
            inner.push_back(ServerSession::new());
            inner.push_back(stale());
            inner.push_back(stale());
        }

        // Both trailing stale records are swept, the front fresh record is
        // returned, and exactly one fresh record remains pooled.
        assert_eq!(pool.acquire(TIMEOUT_MINUTES).id(), front_id);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn acquire_skips_stale_records_at_the_front() {
        let pool = ServerSessionPool::new();
        let fresh = ServerSession::new();
        let fresh_id = fresh.id();

        // A stale record ahead of a fresh one; the sweep only prunes from
        // the back, so the front record is skipped during pop.
        {
            let mut inner = pool.inner.lock();
            inner.push_back(stale());
            inner.push_back(fresh);
        }

        assert_eq!(pool.acquire(TIMEOUT_MINUTES).id(), fresh_id);
        assert!(pool.is_empty());
    }

    #[test]
    fn acquire_on_all_stale_pool_mints() {
        let pool = ServerSessionPool::new();
        let stale_id = {
            let session = stale();
            let id = session.id();
            pool.release_abandoned(session);
            id
        };

        let session = pool.acquire(TIMEOUT_MINUTES);
        assert_ne!(session.id(), stale_id);
        assert!(pool.is_empty());
    }

    #[test]
    fn stale_release_is_discarded() {
        let pool = ServerSessionPool::new();
        pool.release(stale(), TIMEOUT_MINUTES);
        assert!(pool.is_empty());
    }

    #[test]
    fn abandoned_release_lands_at_the_front_unconditionally() {
        let pool = ServerSessionPool::new();
        pool.release(ServerSession::new(), TIMEOUT_MINUTES);

        let session = stale();
        let stale_id = session.id();
        pool.release_abandoned(session);

        assert_eq!(pool.len(), 2);
        // No staleness check on the abandoned path: the stale record is at
        // the front and only the next sweep or pop will prune it.
        assert_eq!(pool.inner.lock().front().unwrap().id(), stale_id);
    }

    #[test]
    fn abandoned_releases_keep_recency_order() {
        let pool = ServerSessionPool::new();
        let (r1, r2) = (ServerSession::new(), ServerSession::new());
        let (id1, id2) = (r1.id(), r2.id());

        pool.release_abandoned(r1);
        pool.release_abandoned(r2);

        assert_eq!(pool.acquire(TIMEOUT_MINUTES).id(), id2);
        assert_eq!(pool.acquire(TIMEOUT_MINUTES).id(), id1);
    }
}
