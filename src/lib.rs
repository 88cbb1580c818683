//! Paced, batched delivery of a dialogue script over SMTP.
//!
//! - [`controller`]: the extract, deliver, wait loop
//! - [`wait`]: the countdown the operator can interrupt

pub mod controller;
pub mod wait;

pub use controller::{Controller, Cycle, Stopped};
pub use wait::{OperatorInput, StdinInput, TimedWait, WaitOutcome};
