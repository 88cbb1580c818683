//! A small SMTP submission client.
//!
//! Only the client half of the protocol is implemented: connect, STARTTLS,
//! AUTH, and a single-recipient mail transaction.

pub mod client;

pub use client::{ClientError, MessageBuilder, Response, SmtpClient};
