//! Logical sessions for ordering sequential operations against a Skerry
//! deployment.
//!
//! A [`ClientSession`] groups related operations so they can be causally
//! ordered.  Every handle borrows a server-assigned session identifier from
//! the deployment-wide [`ServerSessionPool`]; concurrent sessions are a
//! scarce server resource, so ended handles return their identifier for
//! reuse instead of letting the server expire it.
//!
//! With [`SessionOptions::new(true)`](SessionOptions::new), reads through a
//! session observe the effects of earlier writes and reads in the same
//! session, even when served by a secondary.  This crate only carries that
//! flag; the causal token itself is threaded by the operation layer.

pub mod handle;
pub mod options;
pub mod pool;
pub mod record;

pub use handle::{AuthBag, ClientSession, SessionSource};
pub use options::SessionOptions;
pub use pool::ServerSessionPool;
pub use record::{ServerSession, SessionId};
