//! Batched, paced delivery of script messages
//!
//! This crate provides:
//! - A [`Transport`]/[`Session`] seam with an SMTP implementation
//! - The [`DeliveryEngine`], which batches messages, paces sends and retries
//!   failed batches
//! - A transient/fatal error taxonomy driving the retry decision
//! - Progress hooks through [`DeliveryObserver`]

mod batch;
mod engine;
mod error;
mod observer;
pub mod policy;
mod smtp_transport;
mod transport;
mod types;

pub use batch::{Batch, batches};
pub use engine::DeliveryEngine;
// Re-export error types
pub use error::{DeliveryError, FatalError, TransientError};
pub use observer::{DeliveryObserver, TracingObserver};
pub use policy::{DeliveryPolicy, RetryPolicy};
pub use smtp_transport::{SmtpSession, SmtpTransport};
pub use transport::{Session, Transport};
pub use types::{RunOutcome, RunResult};
