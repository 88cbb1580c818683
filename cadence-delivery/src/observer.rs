//! Progress reporting hooks for the delivery engine.

use crate::{DeliveryError, RunResult};

/// Receives progress signals from the engine as a run unfolds.
///
/// Every method has an empty default so reporters only implement what they
/// display.
pub trait DeliveryObserver: Send + Sync {
    /// An attempt at `batch` is about to open a session.
    fn batch_started(&self, _batch: usize, _attempt: u32, _size: usize) {}

    /// The `index`-th message (0-based, within the batch) was accepted.
    fn message_sent(&self, _batch: usize, _index: usize, _size: usize) {}

    fn batch_delivered(&self, _batch: usize) {}

    /// An attempt failed. `retry_in` is set when another attempt follows.
    fn attempt_failed(
        &self,
        _batch: usize,
        _attempt: u32,
        _error: &DeliveryError,
        _retry_in: Option<std::time::Duration>,
    ) {
    }

    /// The batch will not be attempted again; the run is over.
    fn batch_failed(&self, _batch: usize, _attempts: u32) {}

    fn run_finished(&self, _result: &RunResult) {}
}

/// Reports progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DeliveryObserver for TracingObserver {
    fn batch_started(&self, batch: usize, attempt: u32, size: usize) {
        tracing::info!(batch, attempt, size, "Delivering batch {batch}");
    }

    fn message_sent(&self, batch: usize, index: usize, size: usize) {
        tracing::debug!(batch, "Sent {}/{size}", index + 1);
    }

    fn batch_delivered(&self, batch: usize) {
        tracing::info!(batch, "Batch {batch} delivered");
    }

    fn attempt_failed(
        &self,
        batch: usize,
        attempt: u32,
        error: &DeliveryError,
        retry_in: Option<std::time::Duration>,
    ) {
        let transient = error.is_transient();

        match retry_in {
            Some(delay) => tracing::warn!(
                batch,
                attempt,
                transient,
                "Batch {batch} attempt {attempt} failed: {error}; retrying in {delay:?}"
            ),
            None => tracing::warn!(
                batch,
                attempt,
                transient,
                "Batch {batch} attempt {attempt} failed: {error}"
            ),
        }
    }

    fn batch_failed(&self, batch: usize, attempts: u32) {
        tracing::error!(
            batch,
            attempts,
            "Permanent failure on batch {batch} after {attempts} attempts"
        );
    }

    fn run_finished(&self, result: &RunResult) {
        if result.is_success() {
            tracing::info!("Run finished: {result}");
        } else {
            tracing::warn!("Run finished: {result}");
        }
    }
}
