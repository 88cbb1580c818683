//! Loading scripts and configuration from disk.

use std::io::Write;

use cadence_common::{
    Message,
    config::{Config, ConfigError, TlsMode},
    script::{self, ScriptError},
};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn file_with(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn script_from_file() {
    let file = file_with(
        "(INT. KITCHEN - DAY)\n\nALICE:\nHi.\n(beat)\nHow are you?\n\nBOB:\nFine.\n",
    );

    let messages = script::load(file.path()).unwrap();

    assert_eq!(
        messages,
        vec![
            Message::new("ALICE", "Hi."),
            Message::new("ALICE", "How are you?"),
            Message::new("BOB", "Fine."),
        ]
    );
}

#[test]
fn reloading_an_unchanged_script_is_stable() {
    let file = file_with("ALICE:\nOne.\nTwo.\nBOB:\nThree.\n");

    assert_eq!(
        script::load(file.path()).unwrap(),
        script::load(file.path()).unwrap()
    );
}

#[test]
fn missing_script_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.txt");

    let err = script::load(&path).unwrap_err();

    assert!(matches!(err, ScriptError::NotFound(p) if p == path));
}

#[test]
fn config_from_ron_file() {
    let file = file_with(
        r#"(
            smtp: (
                host: "mail.example.com",
                username: "bot@example.com",
                password: "secret",
            ),
            recipient: "reader@example.com",
            source: "act1.txt",
            restart: (countdown_secs: 10),
        )"#,
    );

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.smtp.address(), "mail.example.com:587");
    assert_eq!(config.smtp.tls, TlsMode::StartTls);
    assert_eq!(config.source.to_str(), Some("act1.txt"));
    assert_eq!(config.restart.countdown_secs, 10);
    assert_eq!(config.restart.stop_word, "s");
}

#[test]
fn invalid_ron_file_is_rejected() {
    let file = file_with(
        r#"(
            smtp: (host: "", username: "bot", password: "secret"),
            recipient: "reader@example.com",
        )"#,
    );

    let err = Config::from_file(file.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Missing(key) if key == "smtp.host"));
}
