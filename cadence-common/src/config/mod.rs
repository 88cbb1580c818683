//! Configuration for cadence.
//!
//! A [`Config`] is built once at startup and passed by value into the
//! controller and delivery engine. It is read from one of two sources:
//!
//! 1. A RON file named by `CADENCE_CONFIG`
//! 2. `CADENCE_*` environment variables, after loading `.env` if present
//!
//! Either way the result is validated before anything is delivered.
//!
//! ## Modules
//!
//! - [`smtp`]: server address, credentials and TLS mode
//! - [`delivery`]: pacing, batching, retry and restart settings

pub mod delivery;
pub mod env;
pub mod smtp;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use delivery::{DeliveryConfig, RestartConfig};
pub use smtp::{SmtpConfig, TlsMode};

/// Environment variable naming a RON configuration file.
pub const CONFIG_PATH_VAR: &str = "CADENCE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read config from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to load .env: {0}")]
    Env(#[from] dotenvy::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub smtp: SmtpConfig,

    /// Where every message is delivered.
    pub recipient: String,

    /// The dialogue script.
    ///
    /// Default: "script.txt"
    #[serde(default = "defaults::source")]
    pub source: PathBuf,

    #[serde(default)]
    pub delivery: DeliveryConfig,

    #[serde(default)]
    pub restart: RestartConfig,
}

impl Config {
    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `CADENCE_CONFIG` names a file that cannot be read
    /// or parsed, if a `.env` file exists but is malformed, or if a required
    /// setting is missing or invalid.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            return Self::from_file(path);
        }

        match dotenvy::dotenv() {
            Ok(_) | Err(dotenvy::Error::Io(_)) => {}
            Err(e) => return Err(e.into()),
        }

        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Read and validate a RON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_ron(&content)
    }

    /// Parse and validate RON configuration text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid RON or fails validation.
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build and validate a configuration from `CADENCE_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, or a value
    /// cannot be parsed or fails validation.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = env::from_lookup(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] or [`ConfigError::Missing`] for the
    /// first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(key: &str, value: impl ToString, reason: &str) -> ConfigError {
            ConfigError::Invalid {
                key: key.to_string(),
                value: value.to_string(),
                reason: reason.to_string(),
            }
        }

        if self.smtp.host.trim().is_empty() {
            return Err(ConfigError::Missing(String::from("smtp.host")));
        }

        if self.smtp.port == 0 {
            return Err(invalid("smtp.port", 0, "port must be non-zero"));
        }

        if self.smtp.username.trim().is_empty() {
            return Err(ConfigError::Missing(String::from("smtp.username")));
        }

        if self.recipient.trim().is_empty() {
            return Err(ConfigError::Missing(String::from("recipient")));
        }

        if self.delivery.batch_size == 0 {
            return Err(invalid(
                "delivery.batch_size",
                0,
                "batch size must be at least 1",
            ));
        }

        if self.restart.stop_word.trim().is_empty() {
            return Err(invalid(
                "restart.stop_word",
                &self.restart.stop_word,
                "stop word must not be blank",
            ));
        }

        Ok(())
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn source() -> PathBuf {
        PathBuf::from("script.txt")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        (env::SMTP_HOST, "smtp.example.com"),
        (env::SMTP_USERNAME, "bot@example.com"),
        (env::SMTP_PASSWORD, "secret"),
        (env::RECIPIENT, "reader@example.com"),
    ];

    #[test]
    fn env_defaults() {
        let config = Config::from_lookup(&lookup_from(REQUIRED)).unwrap();

        assert_eq!(config.smtp.host, "smtp.example.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.tls, TlsMode::StartTls);
        assert_eq!(config.smtp.sender(), "bot@example.com");
        assert_eq!(config.recipient, "reader@example.com");
        assert_eq!(config.source, PathBuf::from("script.txt"));
        assert_eq!(config.delivery.message_delay_secs, 1);
        assert_eq!(config.delivery.batch_size, 400);
        assert_eq!(config.delivery.max_retries, 3);
        assert_eq!(config.delivery.backoff_base_secs, 10);
        assert_eq!(config.delivery.fatal_cooldown_secs, 30);
        assert_eq!(config.restart.countdown_secs, 30);
        assert_eq!(config.restart.stop_word, "s");
    }

    #[test]
    fn env_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend_from_slice(&[
            (env::SMTP_PORT, "2525"),
            (env::SMTP_TLS, "none"),
            (env::SMTP_SENDER, "alias@example.com"),
            (env::SMTP_ACCEPT_INVALID_CERTS, "yes"),
            (env::SOURCE, "scripts/act1.txt"),
            (env::MESSAGE_DELAY, "0"),
            (env::BATCH_SIZE, "25"),
            (env::MAX_RETRIES, "5"),
            (env::STOP_WORD, "stop"),
        ]);

        let config = Config::from_lookup(&lookup_from(&pairs)).unwrap();

        assert_eq!(config.smtp.address(), "smtp.example.com:2525");
        assert_eq!(config.smtp.tls, TlsMode::Plain);
        assert_eq!(config.smtp.sender(), "alias@example.com");
        assert!(config.smtp.accept_invalid_certs);
        assert_eq!(config.source, PathBuf::from("scripts/act1.txt"));
        assert_eq!(config.delivery.message_delay_secs, 0);
        assert_eq!(config.delivery.batch_size, 25);
        assert_eq!(config.delivery.max_retries, 5);
        assert_eq!(config.restart.stop_word, "stop");
    }

    #[test]
    fn missing_required_setting() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != env::SMTP_PASSWORD)
            .collect();

        let err = Config::from_lookup(&lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(key) if key == env::SMTP_PASSWORD));
    }

    #[test]
    fn unparsable_number() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((env::SMTP_PORT, "smtp"));

        let err = Config::from_lookup(&lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == env::SMTP_PORT));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((env::BATCH_SIZE, "0"));

        let err = Config::from_lookup(&lookup_from(&pairs)).unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { key, .. } if key == "delivery.batch_size")
        );
    }

    #[test]
    fn ron_config() {
        let config = Config::from_ron(
            r#"(
                smtp: (
                    host: "localhost",
                    port: 2525,
                    username: "bot",
                    password: "secret",
                    tls: Plain,
                ),
                recipient: "reader@example.com",
                delivery: (batch_size: 2, message_delay_secs: 0),
            )"#,
        )
        .unwrap();

        assert_eq!(config.smtp.tls, TlsMode::Plain);
        assert_eq!(config.delivery.batch_size, 2);
        assert_eq!(config.delivery.max_retries, 3);
        assert_eq!(config.restart.countdown_secs, 30);
    }

    #[test]
    fn ron_config_must_name_a_recipient() {
        let err = Config::from_ron(
            r#"(smtp: (host: "localhost", username: "bot", password: "x"))"#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unreadable_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("absent.ron")).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
