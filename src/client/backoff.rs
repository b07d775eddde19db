//! # Reconnect Backoff
//!
//! Exponential backoff with a fixed attempt ceiling for the presence socket.
//!
//! With the defaults the n-th reconnect waits `min(1000 * 2^n, 10000)` ms and
//! at most five reconnects are attempted after a drop.
//!
//! ```rust
//! use quillnest::client::backoff::ReconnectPolicy;
//! use std::time::Duration;
//!
//! let policy = ReconnectPolicy::default();
//! assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
//! assert_eq!(policy.delay_for(4), Duration::from_millis(10000));
//! assert!(!policy.allows(5));
//! ```

use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Reconnects allowed before giving up
    pub max_attempts: u32,
    /// Delay for attempt zero; doubled per attempt
    pub base_delay: Duration,
    /// Upper bound of any single delay
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl ReconnectPolicy {
    /// Whether another reconnect may be scheduled when `attempts` have
    /// already been made.
    pub fn allows(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }

    /// Delay before reconnect number `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis().min(u64::MAX as u128) as u64;
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay = Duration::from_millis(base_ms.saturating_mul(factor));
        delay.min(self.max_delay)
    }
}
