//! When and how fast to reconnect after losing the server.

use std::time::Duration;

use ircsock_config::ConnectionConfig;
use rand::Rng;

/// Exponential backoff with jitter.
///
/// Attempt `n` (starting at 1) waits `base_delay * 2^(n-1)`, capped at
/// `max_delay`, plus up to 25% random jitter.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    /// Give up after this many consecutive failed attempts. 0 = never.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 10,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(120),
        }
    }
}

impl ReconnectPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Uses the `auto_reconnect` flag from the connection settings.
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            enabled: config.auto_reconnect,
            ..Self::default()
        }
    }

    /// Delay before attempt number `attempt` (1-based), or `None` when the
    /// policy says to stop.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if !self.enabled || attempt == 0 {
            return None;
        }
        if self.max_attempts != 0 && attempt > self.max_attempts {
            return None;
        }

        let factor = 2u32.saturating_pow(attempt - 1);
        let delay = self.base_delay.saturating_mul(factor).min(self.max_delay);
        let jitter_ms = (delay.as_millis() / 4) as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::rng().random_range(0..=jitter_ms))
        };
        Some(delay + jitter)
    }
}
