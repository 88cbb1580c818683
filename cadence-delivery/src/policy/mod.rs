//! Delivery policies
//!
//! - [`retry`]: attempt limits and linear backoff per batch
//! - [`DeliveryPolicy`]: batching, pacing and cooldown around it

pub mod retry;

use std::{num::NonZeroUsize, time::Duration};

use cadence_common::config::DeliveryConfig;
pub use retry::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Messages per session.
    pub batch_size: NonZeroUsize,
    /// Pause after every send attempt, successful or not.
    pub message_delay: Duration,
    pub retry: RetryPolicy,
    /// Pause after a fatal error before the run is reported failed.
    pub fatal_cooldown: Duration,
}

impl DeliveryPolicy {
    /// A policy with no pauses at all, mostly useful for tests.
    #[must_use]
    pub fn immediate(batch_size: NonZeroUsize, max_attempts: u32) -> Self {
        Self {
            batch_size,
            message_delay: Duration::ZERO,
            retry: RetryPolicy::new(max_attempts, Duration::ZERO),
            fatal_cooldown: Duration::ZERO,
        }
    }
}

impl From<&DeliveryConfig> for DeliveryPolicy {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            batch_size: NonZeroUsize::new(config.batch_size).unwrap_or(NonZeroUsize::MIN),
            message_delay: config.message_delay(),
            retry: RetryPolicy::new(config.max_retries, config.backoff_base()),
            fatal_cooldown: config.fatal_cooldown(),
        }
    }
}
