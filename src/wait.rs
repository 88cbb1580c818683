//! The interruptible countdown between delivery passes.
//!
//! A background task reads one line of operator input while the foreground
//! counts down once per second. The task hands its line over through a
//! write-once [`oneshot`] slot, which the foreground reads exactly once after
//! the countdown ends. A reader still pending at that point is abandoned, and
//! whatever it reads later is discarded.

use std::time::Duration;

use cadence_common::config::RestartConfig;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    sync::oneshot,
};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Start another delivery pass.
    Continue,
    /// The operator asked to stop.
    Stop,
}

/// Where operator input comes from.
///
/// Each wait cycle asks for a fresh reader, since the reader handed to an
/// abandoned cycle is never returned.
pub trait OperatorInput: Send {
    type Reader: AsyncRead + Unpin + Send + 'static;

    fn reader(&mut self) -> Self::Reader;
}

/// Operator input from the process's standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinInput;

impl OperatorInput for StdinInput {
    type Reader = tokio::io::Stdin;

    fn reader(&mut self) -> Self::Reader {
        tokio::io::stdin()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedWait {
    countdown_secs: u64,
    stop_word: String,
}

impl TimedWait {
    #[must_use]
    pub fn new(countdown_secs: u64, stop_word: impl Into<String>) -> Self {
        Self {
            countdown_secs,
            stop_word: stop_word.into(),
        }
    }

    #[must_use]
    pub const fn countdown_secs(&self) -> u64 {
        self.countdown_secs
    }

    #[must_use]
    pub fn stop_word(&self) -> &str {
        &self.stop_word
    }

    /// Whether `line` asks to stop. Surrounding whitespace and case are
    /// ignored.
    #[must_use]
    pub fn is_stop(&self, line: &str) -> bool {
        line.trim().to_lowercase() == self.stop_word.trim().to_lowercase()
    }

    /// Count down, giving the operator a chance to stop.
    ///
    /// Returns [`WaitOutcome::Stop`] only if a line matching the stop word
    /// arrives before the countdown runs out. Any other line, end of input,
    /// or silence means [`WaitOutcome::Continue`].
    #[tracing::instrument(level = "debug", skip_all, fields(countdown = self.countdown_secs))]
    pub async fn wait<R>(&self, input: R) -> WaitOutcome
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (slot, mut line) = oneshot::channel();

        let reader = tokio::spawn(async move {
            let mut buffer = String::new();
            if BufReader::new(input).read_line(&mut buffer).await.is_ok() {
                // The receiver is gone once the countdown has given up on us.
                let _ = slot.send(buffer);
            }
        });

        tracing::info!(
            "Paused. Enter '{}' to stop; restarting in {}s",
            self.stop_word,
            self.countdown_secs
        );

        for remaining in (1..=self.countdown_secs).rev() {
            tracing::info!(remaining, "Next pass in {remaining}s");
            tokio::time::sleep(TICK).await;

            if reader.is_finished() {
                break;
            }
        }

        drop(reader);

        match line.try_recv() {
            Ok(line) if self.is_stop(&line) => {
                tracing::info!("Stop requested");
                WaitOutcome::Stop
            }
            Ok(line) => {
                tracing::debug!(input = line.trim(), "Input is not the stop word");
                WaitOutcome::Continue
            }
            Err(_) => WaitOutcome::Continue,
        }
    }
}

impl From<&RestartConfig> for TimedWait {
    fn from(config: &RestartConfig) -> Self {
        Self::new(config.countdown_secs, config.stop_word.clone())
    }
}
