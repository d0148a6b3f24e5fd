//! Caller-facing session handles.
//!
//! A [`ClientSession`] is `Active` from construction until [`end`] runs,
//! then permanently `Ended`.  While active it owns one [`ServerSession`]
//! checked out of the owning client's pool; ending the handle returns the
//! record for reuse.  Dropping a handle that was never explicitly ended
//! reclaims the record through the abandoned path instead of leaking it.
//!
//! [`end`]: ClientSession::end

use std::any::Any;
use std::sync::Arc;

use skerry_domain::error::{Error, Result};

use crate::options::SessionOptions;
use crate::record::{ServerSession, SessionId};

/// Credential bookkeeping carried on behalf of the owning client.  Session
/// code stores and hands it back untouched, never inspecting the contents.
pub type AuthBag = Arc<dyn Any + Send + Sync>;

/// The seam to the owning client.
///
/// The client fronts the deployment-wide [`ServerSessionPool`] and threads
/// its configured session timeout into the pool; handles never see the
/// timeout themselves.
///
/// [`ServerSessionPool`]: crate::pool::ServerSessionPool
pub trait SessionSource: Send + Sync {
    /// Check a server session out of the deployment-wide pool.
    fn acquire_server_session(&self) -> ServerSession;

    /// Take back a server session after an orderly [`ClientSession::end`].
    fn release_server_session(&self, session: ServerSession);

    /// Take back a server session reclaimed from a handle dropped while
    /// still active.
    fn release_abandoned_server_session(&self, session: ServerSession);
}

/// A session for ordering sequential operations against a deployment.
pub struct ClientSession {
    client: Arc<dyn SessionSource>,
    server_session: Option<ServerSession>,
    options: SessionOptions,
    auth_bag: AuthBag,
}

impl ClientSession {
    /// Start a session backed by a server session checked out of the
    /// client's pool.
    pub fn start(
        client: Arc<dyn SessionSource>,
        options: SessionOptions,
        auth_bag: AuthBag,
    ) -> Self {
        let server_session = client.acquire_server_session();
        Self::new(client, server_session, options, auth_bag)
    }

    /// Wrap an already checked-out server session.  The handle owns the
    /// record until it ends.
    pub fn new(
        client: Arc<dyn SessionSource>,
        server_session: ServerSession,
        options: SessionOptions,
        auth_bag: AuthBag,
    ) -> Self {
        Self {
            client,
            server_session: Some(server_session),
            options,
            auth_bag,
        }
    }

    /// Finish this session, returning its server session to the pool.
    ///
    /// Idempotent: ending an already ended handle is a no-op.  Issuing any
    /// further operation through the handle afterwards is an error.
    pub fn end(&mut self) {
        if let Some(session) = self.server_session.take() {
            self.client.release_server_session(session);
        }
    }

    /// Run `f` with this session and end it on every exit path.
    ///
    /// The handle is consumed; a normal or early return ends it explicitly,
    /// and an unwind reclaims the server session through the drop path.
    pub fn scoped<T>(mut self, f: impl FnOnce(&mut ClientSession) -> T) -> T {
        let out = f(&mut self);
        self.end();
        out
    }

    /// The client this session was started from.
    pub fn client(&self) -> &Arc<dyn SessionSource> {
        &self.client
    }

    /// The options this session was started with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The client's credential bookkeeping, opaque to session code.
    pub fn auth_bag(&self) -> &AuthBag {
        &self.auth_bag
    }

    /// The opaque server session identifier.
    pub fn session_id(&self) -> Result<SessionId> {
        Ok(self.live()?.id())
    }

    /// True once this session has finished.
    pub fn has_ended(&self) -> bool {
        self.server_session.is_none()
    }

    /// Refresh the server session's recency and return the identifier to
    /// annotate the outgoing operation with.  Every operation issued through
    /// the handle calls this; it is the only path that refreshes recency
    /// between checkout and return.
    pub fn use_session_id(&mut self) -> Result<SessionId> {
        match self.server_session.as_mut() {
            Some(session) => Ok(session.mark_used()),
            None => Err(ended()),
        }
    }

    fn live(&self) -> Result<&ServerSession> {
        self.server_session.as_ref().ok_or_else(ended)
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        // Explicit `end` already emptied the slot; nothing to reclaim then.
        if let Some(session) = self.server_session.take() {
            tracing::trace!(
                session_id = %session.id(),
                "session handle dropped while active"
            );
            self.client.release_abandoned_server_session(session);
        }
    }
}

fn ended() -> Error {
    Error::InvalidOperation("cannot use ended session".into())
}
