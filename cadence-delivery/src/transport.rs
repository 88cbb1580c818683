//! The seam between the delivery engine and whatever carries messages.

use async_trait::async_trait;
use cadence_common::Message;

use crate::DeliveryError;

/// Opens authenticated sessions with a remote mail server.
#[async_trait]
pub trait Transport: Send + Sync {
    type Session: Session;

    /// Connect and authenticate.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] classified as transient or fatal.
    async fn open(&self) -> Result<Self::Session, DeliveryError>;
}

/// An open, authenticated connection. Owned by the engine for one batch.
#[async_trait]
pub trait Session: Send {
    /// Deliver a single message.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] classified as transient or fatal.
    async fn send(&mut self, message: &Message) -> Result<(), DeliveryError>;

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the server does not acknowledge the close. The
    /// session is released either way.
    async fn close(self) -> Result<(), DeliveryError>;
}
