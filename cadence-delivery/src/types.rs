use std::fmt;

/// How a delivery run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every batch was delivered.
    Delivered,
    /// There was nothing to deliver.
    Empty,
    /// A batch failed transiently on every allowed attempt.
    RetriesExhausted { batch: usize, attempts: u32 },
    /// A batch hit a fatal error.
    Fatal { batch: usize },
}

/// Aggregate result of [`DeliveryEngine::deliver`](crate::DeliveryEngine::deliver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub outcome: RunOutcome,
    pub batches_total: usize,
    pub batches_delivered: usize,
    /// Successful sends, including any from attempts that later failed.
    pub messages_sent: usize,
    /// Sessions opened or attempted across all batches.
    pub attempts: u32,
}

impl RunResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Delivered | RunOutcome::Empty)
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            RunOutcome::Delivered => write!(
                f,
                "delivered {} messages in {} batches",
                self.messages_sent, self.batches_total
            ),
            RunOutcome::Empty => write!(f, "nothing to deliver"),
            RunOutcome::RetriesExhausted { batch, attempts } => write!(
                f,
                "batch {batch}/{} failed after {attempts} attempts ({} of {} batches delivered)",
                self.batches_total, self.batches_delivered, self.batches_total
            ),
            RunOutcome::Fatal { batch } => write!(
                f,
                "batch {batch}/{} aborted by a fatal error ({} of {} batches delivered)",
                self.batches_total, self.batches_delivered, self.batches_total
            ),
        }
    }
}
