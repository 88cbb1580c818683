//! SMTP-backed [`Transport`].
//!
//! Opening a session performs the whole submission handshake:
//! 1. Connect and read the greeting
//! 2. EHLO
//! 3. STARTTLS and a second EHLO, unless TLS is disabled
//! 4. AUTH PLAIN, or AUTH LOGIN when that is the only advertised mechanism
//!
//! Each [`SmtpSession::send`] is then one MAIL FROM / RCPT TO / DATA
//! transaction on the open connection.

use async_trait::async_trait;
use cadence_common::{
    Message,
    config::{Config, TlsMode},
    tracing,
};
use cadence_smtp::{MessageBuilder, Response, SmtpClient};
use rand::Rng;

use crate::{
    DeliveryError,
    error::TransientError,
    transport::{Session, Transport},
};

/// Envelope and header settings shared by every session.
#[derive(Debug, Clone)]
struct Envelope {
    sender: String,
    recipient: String,
    subject_prefix: String,
}

#[derive(Debug, Clone)]
pub struct SmtpTransport {
    address: String,
    server_domain: String,
    helo_domain: String,
    username: String,
    password: String,
    tls: TlsMode,
    accept_invalid_certs: bool,
    envelope: Envelope,
}

impl SmtpTransport {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            address: config.smtp.address(),
            server_domain: config.smtp.host.clone(),
            helo_domain: config.smtp.helo_domain.clone(),
            username: config.smtp.username.clone(),
            password: config.smtp.password.clone(),
            tls: config.smtp.tls,
            accept_invalid_certs: config.smtp.accept_invalid_certs,
            envelope: Envelope {
                sender: config.smtp.sender().to_string(),
                recipient: config.recipient.clone(),
                subject_prefix: config.delivery.subject_prefix.clone(),
            },
        }
    }

    async fn ehlo(&self, client: &mut SmtpClient) -> Result<Response, DeliveryError> {
        Ok(client.ehlo(&self.helo_domain).await?.ensure_success()?)
    }

    async fn authenticate(
        &self,
        client: &mut SmtpClient,
        capabilities: &Response,
    ) -> Result<(), DeliveryError> {
        let mechanisms = capabilities.auth_mechanisms();
        let login_only = !mechanisms.iter().any(|m| m == "PLAIN")
            && mechanisms.iter().any(|m| m == "LOGIN");

        let response = if login_only {
            client.auth_login(&self.username, &self.password).await?
        } else {
            client.auth_plain(&self.username, &self.password).await?
        };

        response.ensure_success()?;
        Ok(())
    }
}

#[async_trait]
impl Transport for SmtpTransport {
    type Session = SmtpSession;

    #[tracing::instrument(level = "debug", skip(self), fields(server = %self.address))]
    async fn open(&self) -> Result<SmtpSession, DeliveryError> {
        if self.accept_invalid_certs {
            tracing::warn!(
                server = %self.address,
                "SECURITY WARNING: TLS certificate validation is disabled for this connection"
            );
        }

        let mut client = SmtpClient::connect(&self.address, self.server_domain.clone())
            .await
            .map_err(|e| {
                TransientError::ConnectionFailed(format!(
                    "Failed to connect to {}: {e}",
                    self.address
                ))
            })?
            .accept_invalid_certs(self.accept_invalid_certs);

        client.read_greeting().await?.ensure_success()?;

        let mut capabilities = self.ehlo(&mut client).await?;

        if self.tls == TlsMode::StartTls {
            client.starttls().await?.ensure_success()?;
            capabilities = self.ehlo(&mut client).await?;
        }

        self.authenticate(&mut client, &capabilities).await?;

        tracing::debug!(server = %self.address, tls = client.is_tls(), "Session opened");

        Ok(SmtpSession {
            client,
            envelope: self.envelope.clone(),
        })
    }
}

pub struct SmtpSession {
    client: SmtpClient,
    envelope: Envelope,
}

impl SmtpSession {
    /// `"{prefix} [{4 hex digits}] {unix seconds}"`, unique enough that mail
    /// clients do not thread consecutive lines together.
    fn subject(&self) -> String {
        let tag: u16 = rand::rng().random();
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        format!("{} [{tag:04x}] {now}", self.envelope.subject_prefix)
    }
}

#[async_trait]
impl Session for SmtpSession {
    async fn send(&mut self, message: &Message) -> Result<(), DeliveryError> {
        let content = MessageBuilder::new()
            .from(&self.envelope.sender)
            .to(&self.envelope.recipient)
            .subject(self.subject())
            .header("X-Cadence-Speaker", message.speaker())
            .body(message.body())
            .build()?;

        self.client
            .mail_from(&self.envelope.sender)
            .await?
            .ensure_success()?;
        self.client
            .rcpt_to(&self.envelope.recipient)
            .await?
            .ensure_success()?;
        self.client.data().await?.ensure_intermediate()?;
        self.client.send_data(&content).await?.ensure_success()?;

        Ok(())
    }

    async fn close(mut self) -> Result<(), DeliveryError> {
        self.client.quit().await?;
        Ok(())
    }
}
