//! Reader configuration

use std::time::Duration;

use bytes::Bytes;
use olstap_wire::OLSTAP_AID;

/// Delay between failed read attempts; prevents a tight failure loop from
/// starving the radio.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(800);

/// Configuration for the reader service
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Application identifier selected on every exchange
    pub aid: Bytes,
    /// Backoff interval after a failed attempt
    pub retry_backoff: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            aid: Bytes::from_static(&OLSTAP_AID),
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

impl ReaderConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application identifier to select
    pub fn with_aid(mut self, aid: impl Into<Bytes>) -> Self {
        self.aid = aid.into();
        self
    }

    /// Set the backoff interval after a failed attempt
    pub const fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}
