use std::path::PathBuf;

use cadence_common::{
    config::Config,
    internal,
    script::{self, ScriptError},
};
use cadence_delivery::{
    DeliveryEngine, DeliveryObserver, DeliveryPolicy, RunResult, TracingObserver, Transport,
};

use crate::wait::{OperatorInput, StdinInput, TimedWait, WaitOutcome};

/// What a single extract-and-deliver pass amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// The script is missing or holds no dialogue.
    NoContent,
    /// Delivery ran; the result says how far it got.
    Delivered(RunResult),
    /// The script exists but could not be read.
    Unreadable,
}

/// Why [`Controller::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopped {
    NoContent,
    Operator,
}

/// Runs delivery passes over the script until told to stop.
pub struct Controller<T, O = TracingObserver, I = StdinInput> {
    engine: DeliveryEngine<T, O>,
    wait: TimedWait,
    source: PathBuf,
    input: I,
}

impl<T: Transport> Controller<T> {
    /// A controller reading operator input from stdin.
    #[must_use]
    pub fn new(config: &Config, transport: T) -> Self {
        Self::from_parts(
            DeliveryEngine::new(transport, DeliveryPolicy::from(&config.delivery)),
            TimedWait::from(&config.restart),
            config.source.clone(),
            StdinInput,
        )
    }
}

impl<T, O, I> Controller<T, O, I>
where
    T: Transport,
    O: DeliveryObserver,
    I: OperatorInput,
{
    #[must_use]
    pub const fn from_parts(
        engine: DeliveryEngine<T, O>,
        wait: TimedWait,
        source: PathBuf,
        input: I,
    ) -> Self {
        Self {
            engine,
            wait,
            source,
            input,
        }
    }

    pub const fn engine(&self) -> &DeliveryEngine<T, O> {
        &self.engine
    }

    /// Alternate delivery passes and countdowns.
    ///
    /// Returns once the operator stops the countdown, or as soon as a pass
    /// finds nothing to deliver. A failed delivery does not end the loop.
    pub async fn run(&mut self) -> Stopped {
        internal!(level = INFO, "Delivering {}", self.source.display());

        loop {
            if self.cycle().await == Cycle::NoContent {
                return Stopped::NoContent;
            }

            if self.wait.wait(self.input.reader()).await == WaitOutcome::Stop {
                return Stopped::Operator;
            }

            internal!(level = INFO, "Starting another pass");
        }
    }

    /// Extract the script and deliver it once.
    #[tracing::instrument(level = "debug", skip_all, fields(source = %self.source.display()))]
    pub async fn cycle(&self) -> Cycle {
        let messages = match script::load(&self.source) {
            Ok(messages) => messages,
            Err(ScriptError::NotFound(path)) => {
                tracing::error!("Missing script: {}", path.display());
                return Cycle::NoContent;
            }
            Err(e) => {
                tracing::error!("{e}");
                return Cycle::Unreadable;
            }
        };

        if messages.is_empty() {
            tracing::warn!("No dialogue found in {}", self.source.display());
            return Cycle::NoContent;
        }

        tracing::info!(messages = messages.len(), "Preparing {} messages", messages.len());

        let result = self.engine.deliver(&messages).await;

        if result.is_success() {
            tracing::info!("All messages delivered successfully");
        } else {
            tracing::warn!("Partial delivery completed: {result}");
        }

        Cycle::Delivered(result)
    }
}
