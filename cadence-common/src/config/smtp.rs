//! Connection settings for the remote mail server.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether the connection is upgraded with STARTTLS before authenticating.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TlsMode {
    /// Upgrade with STARTTLS straight after the first EHLO.
    #[default]
    StartTls,
    /// Stay on plain TCP. Only sensible for local relays and tests.
    Plain,
}

impl std::str::FromStr for TlsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "starttls" | "start_tls" | "tls" => Ok(Self::StartTls),
            "none" | "plain" | "off" => Ok(Self::Plain),
            other => Err(format!("unknown TLS mode '{other}'")),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,

    /// Default: 587 (submission)
    #[serde(default = "defaults::port")]
    pub port: u16,

    pub username: String,

    pub password: String,

    /// Envelope sender. Falls back to `username` when unset.
    #[serde(default)]
    pub sender: Option<String>,

    #[serde(default)]
    pub tls: TlsMode,

    /// Skip certificate verification after STARTTLS. Testing only.
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Domain announced in EHLO.
    ///
    /// Default: "localhost"
    #[serde(default = "defaults::helo_domain")]
    pub helo_domain: String,
}

impl SmtpConfig {
    /// `host:port`, as passed to the TCP connector.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn sender(&self) -> &str {
        self.sender.as_deref().unwrap_or(&self.username)
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .field("tls", &self.tls)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("helo_domain", &self.helo_domain)
            .finish()
    }
}

pub(super) mod defaults {
    pub const fn port() -> u16 {
        587
    }

    pub fn helo_domain() -> String {
        String::from("localhost")
    }
}
