//! SMTP client used to submit dialogue messages to a mail server.
//!
//! It supports:
//!
//! - Plain TCP connections with an optional STARTTLS upgrade
//! - AUTH PLAIN and AUTH LOGIN
//! - Single and multi-line response parsing
//! - Building plain-text messages
//!
//! Calls carry no timeout of their own. A server that stops responding
//! blocks the caller until the connection is torn down.
//!
//! # Examples
//!
//! ```no_run
//! use cadence_smtp::client::{MessageBuilder, SmtpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = SmtpClient::connect("smtp.example.com:587", "smtp.example.com".into()).await?;
//! client.read_greeting().await?;
//! client.ehlo("client.example.com").await?;
//! client.starttls().await?;
//! client.ehlo("client.example.com").await?;
//! client.auth_plain("bot@example.com", "secret").await?;
//!
//! let message = MessageBuilder::new()
//!     .from("bot@example.com")
//!     .to("reader@example.com")
//!     .subject("Hello")
//!     .body("ALICE: Good morning.")
//!     .build()?;
//!
//! client.mail_from("bot@example.com").await?;
//! client.rcpt_to("reader@example.com").await?;
//! client.data().await?;
//! client.send_data(&message).await?;
//! client.quit().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod message;
mod response;
mod smtp_client;

pub use error::{ClientError, Result};
pub use message::MessageBuilder;
pub use response::{Response, ResponseLine};
pub use smtp_client::SmtpClient;
