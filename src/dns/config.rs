//! Lookup configuration.

use super::roster::Roster;
use std::time::Duration;

/// Timeout applied to every individual lookup, local or remote.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(1);

/// Fallback resolver configuration.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Bound on each single lookup
    pub timeout: Duration,
    /// Servers raced when the local resolver fails
    pub roster: Roster,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_LOOKUP_TIMEOUT,
            roster: Roster::public(),
        }
    }
}

impl LookupConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-lookup timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the fallback roster.
    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }
}
