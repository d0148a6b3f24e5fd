use serde::{Deserialize, Serialize};

use skerry_domain::config::SessionsConfig;

/// Options for a new [`ClientSession`].  Immutable once constructed.
///
/// [`ClientSession`]: crate::handle::ClientSession
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    causally_consistent: bool,
}

impl SessionOptions {
    /// With `causally_consistent`, read operations through the session are
    /// causally ordered after prior reads and writes in the same session.
    pub fn new(causally_consistent: bool) -> Self {
        Self {
            causally_consistent,
        }
    }

    /// Default options for handles on a deployment with this configuration.
    pub fn from_config(config: &SessionsConfig) -> Self {
        Self::new(config.causally_consistent)
    }

    /// Whether causally consistent reads are configured.
    pub fn causally_consistent(&self) -> bool {
        self.causally_consistent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_unordered_reads() {
        assert!(!SessionOptions::default().causally_consistent());
    }

    #[test]
    fn follows_deployment_config() {
        let config = SessionsConfig {
            causally_consistent: true,
            ..Default::default()
        };
        assert!(SessionOptions::from_config(&config).causally_consistent());
    }
}
