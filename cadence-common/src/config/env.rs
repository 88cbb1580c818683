//! Building a [`Config`] from `CADENCE_*` environment variables.

use std::{fmt::Display, path::PathBuf, str::FromStr};

use super::{
    Config, ConfigError, DeliveryConfig, RestartConfig, SmtpConfig, TlsMode, smtp,
};

pub const SMTP_HOST: &str = "CADENCE_SMTP_HOST";
pub const SMTP_PORT: &str = "CADENCE_SMTP_PORT";
pub const SMTP_USERNAME: &str = "CADENCE_SMTP_USERNAME";
pub const SMTP_PASSWORD: &str = "CADENCE_SMTP_PASSWORD";
pub const SMTP_SENDER: &str = "CADENCE_SMTP_SENDER";
pub const SMTP_TLS: &str = "CADENCE_SMTP_TLS";
pub const SMTP_ACCEPT_INVALID_CERTS: &str = "CADENCE_SMTP_ACCEPT_INVALID_CERTS";
pub const SMTP_HELO: &str = "CADENCE_SMTP_HELO";
pub const RECIPIENT: &str = "CADENCE_RECIPIENT";
pub const SOURCE: &str = "CADENCE_SOURCE";
pub const MESSAGE_DELAY: &str = "CADENCE_MESSAGE_DELAY";
pub const BATCH_SIZE: &str = "CADENCE_BATCH_SIZE";
pub const MAX_RETRIES: &str = "CADENCE_MAX_RETRIES";
pub const BACKOFF_BASE: &str = "CADENCE_BACKOFF_BASE";
pub const FATAL_COOLDOWN: &str = "CADENCE_FATAL_COOLDOWN";
pub const SUBJECT_PREFIX: &str = "CADENCE_SUBJECT_PREFIX";
pub const RESTART_COUNTDOWN: &str = "CADENCE_RESTART_COUNTDOWN";
pub const STOP_WORD: &str = "CADENCE_STOP_WORD";

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn optional(lookup: Lookup<'_>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn required(lookup: Lookup<'_>, key: &str) -> Result<String, ConfigError> {
    optional(lookup, key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn parsed<T>(lookup: Lookup<'_>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    optional(lookup, key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key: key.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn flag(lookup: Lookup<'_>, key: &str) -> Result<bool, ConfigError> {
    let Some(value) = optional(lookup, key) else {
        return Ok(false);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            value,
            reason: String::from("expected a boolean"),
        }),
    }
}

pub(super) fn from_lookup(lookup: Lookup<'_>) -> Result<Config, ConfigError> {
    let delivery_defaults = DeliveryConfig::default();
    let restart_defaults = RestartConfig::default();

    let smtp = SmtpConfig {
        host: required(lookup, SMTP_HOST)?,
        port: parsed(lookup, SMTP_PORT)?.unwrap_or_else(smtp::defaults::port),
        username: required(lookup, SMTP_USERNAME)?,
        password: required(lookup, SMTP_PASSWORD)?,
        sender: optional(lookup, SMTP_SENDER),
        tls: parsed::<TlsMode>(lookup, SMTP_TLS)?.unwrap_or_default(),
        accept_invalid_certs: flag(lookup, SMTP_ACCEPT_INVALID_CERTS)?,
        helo_domain: optional(lookup, SMTP_HELO).unwrap_or_else(smtp::defaults::helo_domain),
    };

    let delivery = DeliveryConfig {
        message_delay_secs: parsed(lookup, MESSAGE_DELAY)?
            .unwrap_or(delivery_defaults.message_delay_secs),
        batch_size: parsed(lookup, BATCH_SIZE)?.unwrap_or(delivery_defaults.batch_size),
        max_retries: parsed(lookup, MAX_RETRIES)?.unwrap_or(delivery_defaults.max_retries),
        backoff_base_secs: parsed(lookup, BACKOFF_BASE)?
            .unwrap_or(delivery_defaults.backoff_base_secs),
        fatal_cooldown_secs: parsed(lookup, FATAL_COOLDOWN)?
            .unwrap_or(delivery_defaults.fatal_cooldown_secs),
        subject_prefix: optional(lookup, SUBJECT_PREFIX)
            .unwrap_or(delivery_defaults.subject_prefix),
    };

    let restart = RestartConfig {
        countdown_secs: parsed(lookup, RESTART_COUNTDOWN)?
            .unwrap_or(restart_defaults.countdown_secs),
        stop_word: optional(lookup, STOP_WORD).unwrap_or(restart_defaults.stop_word),
    };

    Ok(Config {
        smtp,
        recipient: required(lookup, RECIPIENT)?,
        source: optional(lookup, SOURCE).map_or_else(super::defaults::source, PathBuf::from),
        delivery,
        restart,
    })
}
