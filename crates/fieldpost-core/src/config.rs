//! Engine configuration.

use std::time::Duration;

/// Tunable parameters for a [`Mailbox`](crate::Mailbox).
///
/// The defaults match the service's intended client behavior; tests
/// shrink the intervals to keep runs fast.
#[derive(Debug, Clone)]
pub struct MailboxConfig {
    /// REST mount of the mail service (for example `https://host/api`).
    pub base_url: String,
    /// WebSocket mount for the push channel (for example `wss://host`).
    pub ws_url: String,
    /// Rows requested per listing page.
    pub page_size: usize,
    /// Quiet period between search edits and the triggered fetch.
    pub search_debounce: Duration,
    /// Interval between liveness pings on the push channel.
    pub heartbeat_interval: Duration,
    /// Interval of the stats poll that covers for a missing channel.
    pub fallback_poll_interval: Duration,
}

impl MailboxConfig {
    /// Creates a configuration with default tuning for the given mounts.
    #[must_use]
    pub fn new(base_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ws_url: ws_url.into(),
            page_size: 20,
            search_debounce: Duration::from_millis(400),
            heartbeat_interval: Duration::from_secs(30),
            fallback_poll_interval: Duration::from_secs(60),
        }
    }

    /// Sets the listing page size.
    #[must_use]
    pub const fn page_size(mut self, rows: usize) -> Self {
        self.page_size = rows;
        self
    }

    /// Sets the search debounce delay.
    #[must_use]
    pub const fn search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }

    /// Sets the push heartbeat interval.
    #[must_use]
    pub const fn heartbeat_interval(mut self, every: Duration) -> Self {
        self.heartbeat_interval = every;
        self
    }

    /// Sets the fallback stats poll interval.
    #[must_use]
    pub const fn fallback_poll_interval(mut self, every: Duration) -> Self {
        self.fallback_poll_interval = every;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_tuning() {
        let config = MailboxConfig::new("https://host/api", "wss://host");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.search_debounce, Duration::from_millis(400));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
        assert_eq!(config.fallback_poll_interval, Duration::from_secs(60));
    }

    #[test]
    fn setters_chain() {
        let config = MailboxConfig::new("http://localhost", "ws://localhost")
            .page_size(5)
            .search_debounce(Duration::from_millis(10));
        assert_eq!(config.page_size, 5);
        assert_eq!(config.search_debounce, Duration::from_millis(10));
    }
}
