//! Typed error handling for delivery operations.
//!
//! Failures fall into two classes:
//! - Transient failures (connection drops, 4xx replies, garbled responses) are
//!   retried for the whole batch with a linear backoff
//! - Fatal failures (5xx rejections, unexpected replies, invalid messages) end
//!   the run without a retry

use cadence_smtp::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Transient failure: {0}")]
    Transient(#[from] TransientError),

    #[error("Fatal failure: {0}")]
    Fatal(#[from] FatalError),
}

/// Connection-level errors expected to clear up on a fresh connection.
#[derive(Debug, Error)]
pub enum TransientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection closed unexpectedly")]
    Disconnected,

    #[error("Temporary SMTP error: {0}")]
    SmtpTemporary(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("TLS handshake failed: {0}")]
    TlsHandshakeFailed(String),
}

#[derive(Debug, Error)]
pub enum FatalError {
    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error("Unexpected SMTP response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeliveryError {
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

/// Classify an SMTP client error.
///
/// - **I/O, dropped connections, TLS failures** → Transient
/// - **Malformed responses** (parse and UTF-8 errors) → Transient
/// - **4xx replies** → Transient
/// - **5xx replies** → Fatal
/// - **Unexpected reply codes, message build errors** → Fatal
impl From<ClientError> for DeliveryError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::SmtpError { code, message } if (400..500).contains(&code) => {
                Self::Transient(TransientError::SmtpTemporary(format!("{code} {message}")))
            }

            ClientError::SmtpError { code, message } if (500..600).contains(&code) => {
                Self::Fatal(FatalError::Rejected(format!("{code} {message}")))
            }

            ClientError::SmtpError { code, message }
            | ClientError::UnexpectedResponse { code, message } => {
                Self::Fatal(FatalError::UnexpectedResponse(format!("{code} {message}")))
            }

            ClientError::Io(e) => {
                Self::Transient(TransientError::ConnectionFailed(format!("I/O error: {e}")))
            }

            ClientError::ConnectionClosed => Self::Transient(TransientError::Disconnected),

            ClientError::TlsError(msg) => {
                Self::Transient(TransientError::TlsHandshakeFailed(msg))
            }

            ClientError::ParseError(msg) => {
                Self::Transient(TransientError::MalformedResponse(msg))
            }

            ClientError::Utf8Error(e) => {
                Self::Transient(TransientError::MalformedResponse(e.to_string()))
            }

            ClientError::BuilderError(msg) => Self::Fatal(FatalError::InvalidMessage(msg)),
        }
    }
}
