//! Pacing, batching and restart settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Pause after every send attempt.
    ///
    /// Default: 1 second
    #[serde(default = "defaults::message_delay_secs")]
    pub message_delay_secs: u64,

    /// Messages sent per connection.
    ///
    /// Default: 400
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Connection attempts per batch before the run is abandoned.
    ///
    /// Default: 3
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Linear backoff step: the n-th retry waits `n * backoff_base_secs`.
    ///
    /// Default: 10 seconds
    #[serde(default = "defaults::backoff_base_secs")]
    pub backoff_base_secs: u64,

    /// Pause after an unrecoverable error before the run is reported failed.
    ///
    /// Default: 30 seconds
    #[serde(default = "defaults::fatal_cooldown_secs")]
    pub fatal_cooldown_secs: u64,

    /// Leading text of every Subject header.
    ///
    /// Default: "Cadence"
    #[serde(default = "defaults::subject_prefix")]
    pub subject_prefix: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            message_delay_secs: defaults::message_delay_secs(),
            batch_size: defaults::batch_size(),
            max_retries: defaults::max_retries(),
            backoff_base_secs: defaults::backoff_base_secs(),
            fatal_cooldown_secs: defaults::fatal_cooldown_secs(),
            subject_prefix: defaults::subject_prefix(),
        }
    }
}

impl DeliveryConfig {
    #[must_use]
    pub const fn message_delay(&self) -> Duration {
        Duration::from_secs(self.message_delay_secs)
    }

    #[must_use]
    pub const fn backoff_base(&self) -> Duration {
        Duration::from_secs(self.backoff_base_secs)
    }

    #[must_use]
    pub const fn fatal_cooldown(&self) -> Duration {
        Duration::from_secs(self.fatal_cooldown_secs)
    }
}

/// The pause between delivery passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartConfig {
    /// Seconds the operator has to stop the process before the next pass.
    ///
    /// Default: 30
    #[serde(default = "defaults::countdown_secs")]
    pub countdown_secs: u64,

    /// Input that stops the process, compared case-insensitively.
    ///
    /// Default: "s"
    #[serde(default = "defaults::stop_word")]
    pub stop_word: String,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            countdown_secs: defaults::countdown_secs(),
            stop_word: defaults::stop_word(),
        }
    }
}

pub(super) mod defaults {
    pub const fn message_delay_secs() -> u64 {
        1
    }

    pub const fn batch_size() -> usize {
        400
    }

    pub const fn max_retries() -> u32 {
        3
    }

    pub const fn backoff_base_secs() -> u64 {
        10
    }

    pub const fn fatal_cooldown_secs() -> u64 {
        30
    }

    pub fn subject_prefix() -> String {
        String::from("Cadence")
    }

    pub const fn countdown_secs() -> u64 {
        30
    }

    pub fn stop_word() -> String {
        String::from("s")
    }
}
