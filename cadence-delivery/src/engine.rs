//! The batch delivery engine.
//!
//! Messages are split into batches and each batch is delivered over its own
//! session. A batch moves through a small state machine:
//!
//! ```text
//!   ──► Attempting(n) ──ok──► Delivered
//!         │    │
//!         │    └── transient ──► Backoff(n) ──attempts left──► Attempting(n + 1)
//!         │                          └───── none left ───────► Exhausted
//!         └─────── fatal ──► Fatal
//! ```
//!
//! Every transient failure, the last one included, is followed by a linear
//! backoff pause. The session opened by an attempt is closed before the
//! attempt's outcome is acted on, whatever that outcome is. Exhausted and
//! Fatal end the whole run: later batches are never attempted.

use std::time::Duration;

use cadence_common::Message;

use crate::{
    DeliveryError, DeliveryObserver, RunOutcome, RunResult, TracingObserver,
    batch::{Batch, batches},
    policy::DeliveryPolicy,
    transport::{Session, Transport},
};

#[derive(Debug)]
enum AttemptState {
    Attempting(u32),
    Backoff {
        attempt: u32,
        delay: Duration,
        retrying: bool,
    },
    Delivered,
    Exhausted { attempts: u32 },
    Fatal { attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchOutcome {
    Delivered,
    Exhausted { attempts: u32 },
    Fatal,
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Delivers messages in paced batches over sessions opened by `T`.
///
/// Only one session is ever open at a time and messages are sent strictly
/// in order.
pub struct DeliveryEngine<T, O = TracingObserver> {
    transport: T,
    policy: DeliveryPolicy,
    observer: O,
}

impl<T: Transport> DeliveryEngine<T> {
    #[must_use]
    pub const fn new(transport: T, policy: DeliveryPolicy) -> Self {
        Self::with_observer(transport, policy, TracingObserver)
    }
}

impl<T, O> DeliveryEngine<T, O>
where
    T: Transport,
    O: DeliveryObserver,
{
    #[must_use]
    pub const fn with_observer(transport: T, policy: DeliveryPolicy, observer: O) -> Self {
        Self {
            transport,
            policy,
            observer,
        }
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// Deliver every message, batch by batch.
    ///
    /// Never fails: the outcome, including partial failure, is described by
    /// the returned [`RunResult`].
    #[tracing::instrument(level = "info", skip_all, fields(messages = messages.len()))]
    pub async fn deliver(&self, messages: &[Message]) -> RunResult {
        let batch_size = self.policy.batch_size;
        let mut result = RunResult {
            outcome: RunOutcome::Delivered,
            batches_total: messages.len().div_ceil(batch_size.get()),
            batches_delivered: 0,
            messages_sent: 0,
            attempts: 0,
        };

        if messages.is_empty() {
            result.outcome = RunOutcome::Empty;
        }

        for batch in batches(messages, batch_size) {
            match self.deliver_batch(batch, &mut result).await {
                BatchOutcome::Delivered => result.batches_delivered += 1,
                BatchOutcome::Exhausted { attempts } => {
                    result.outcome = RunOutcome::RetriesExhausted {
                        batch: batch.number,
                        attempts,
                    };
                    break;
                }
                BatchOutcome::Fatal => {
                    result.outcome = RunOutcome::Fatal {
                        batch: batch.number,
                    };
                    break;
                }
            }
        }

        self.observer.run_finished(&result);
        result
    }

    async fn deliver_batch(&self, batch: Batch<'_>, result: &mut RunResult) -> BatchOutcome {
        let retry = self.policy.retry;
        let mut state = AttemptState::Attempting(1);

        loop {
            state = match state {
                AttemptState::Attempting(attempt) => {
                    result.attempts += 1;
                    self.observer
                        .batch_started(batch.number, attempt, batch.len());

                    match self.attempt(batch, &mut result.messages_sent).await {
                        Ok(()) => AttemptState::Delivered,
                        Err(error) if error.is_fatal() => {
                            self.observer
                                .attempt_failed(batch.number, attempt, &error, None);
                            AttemptState::Fatal { attempts: attempt }
                        }
                        Err(error) => {
                            let retrying = retry.should_retry(attempt);
                            let delay = retry.backoff(attempt);
                            self.observer.attempt_failed(
                                batch.number,
                                attempt,
                                &error,
                                retrying.then_some(delay),
                            );
                            AttemptState::Backoff {
                                attempt,
                                delay,
                                retrying,
                            }
                        }
                    }
                }
                AttemptState::Backoff {
                    attempt,
                    delay,
                    retrying,
                } => {
                    pause(delay).await;
                    if retrying {
                        AttemptState::Attempting(attempt + 1)
                    } else {
                        AttemptState::Exhausted { attempts: attempt }
                    }
                }
                AttemptState::Delivered => {
                    self.observer.batch_delivered(batch.number);
                    return BatchOutcome::Delivered;
                }
                AttemptState::Exhausted { attempts } => {
                    self.observer.batch_failed(batch.number, attempts);
                    return BatchOutcome::Exhausted { attempts };
                }
                AttemptState::Fatal { attempts } => {
                    pause(self.policy.fatal_cooldown).await;
                    self.observer.batch_failed(batch.number, attempts);
                    return BatchOutcome::Fatal;
                }
            };
        }
    }

    /// One attempt at a batch: open, send everything, close.
    async fn attempt(&self, batch: Batch<'_>, sent: &mut usize) -> Result<(), DeliveryError> {
        let mut session = self.transport.open().await?;

        let outcome = self.send_all(&mut session, batch, sent).await;

        if let Err(e) = session.close().await {
            if outcome.is_ok() {
                tracing::warn!(
                    batch = batch.number,
                    "Closing session failed after the batch was delivered: {e}"
                );
            } else {
                tracing::debug!(batch = batch.number, "Closing failed session: {e}");
            }
        }

        outcome
    }

    async fn send_all(
        &self,
        session: &mut T::Session,
        batch: Batch<'_>,
        sent: &mut usize,
    ) -> Result<(), DeliveryError> {
        for (index, message) in batch.messages.iter().enumerate() {
            let outcome = session.send(message).await;

            if outcome.is_ok() {
                *sent += 1;
                self.observer.message_sent(batch.number, index, batch.len());
            }

            pause(self.policy.message_delay).await;
            outcome?;
        }

        Ok(())
    }
}
