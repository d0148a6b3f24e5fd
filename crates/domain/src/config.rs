use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sessions: SessionsConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.sessions.validate()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Logical session configuration.
///
/// `timeout_minutes` mirrors the session timeout the deployment itself
/// enforces.  The driver treats a pooled server session as stale one minute
/// *before* that deadline so it never hands out an identifier the server may
/// concurrently be discarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Server-side session timeout, in minutes.
    #[serde(default = "d_timeout_minutes")]
    pub timeout_minutes: u32,

    /// Default read ordering for new session handles.  When `true`, reads
    /// through a handle are causally ordered after prior operations in the
    /// same handle.
    #[serde(default)]
    pub causally_consistent: bool,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: d_timeout_minutes(),
            causally_consistent: false,
        }
    }
}

impl SessionsConfig {
    /// Reject configurations the staleness margin cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_minutes == 0 {
            return Err(Error::Config(
                "sessions.timeout_minutes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_timeout_minutes() -> u32 {
    30
}
