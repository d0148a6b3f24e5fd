//! Shared domain layer for the Skerry driver crates.
//!
//! Holds the error type, deployment configuration, and structured trace
//! events used across the workspace.

pub mod config;
pub mod error;
pub mod trace;

pub use config::{Config, SessionsConfig};
pub use error::{Error, Result};
pub use trace::TraceEvent;
