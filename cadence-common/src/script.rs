//! Dialogue script extraction.
//!
//! A script is plain text. A line made only of upper-case letters and spaces
//! followed by a colon (`ALICE:`) opens a speaker block, and every following
//! non-empty line belongs to that speaker until the next header. Lines wrapped
//! in parentheses are stage directions and are skipped.
//!
//! Extraction happens in two steps: [`tokenize`] classifies every line, and
//! [`extract`] folds the tokens into [`Message`]s.

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::Message;

/// Classification of a single script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `NAME:` opening a new speaker block, holding the trimmed name.
    SpeakerHeader(String),
    /// A line spoken by the current speaker.
    Utterance(String),
    /// A parenthesised stage direction, kept verbatim.
    Comment(String),
    /// An empty line, or a lone `:`.
    Blank,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Script not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unable to read script {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn is_speaker_header(line: &str) -> bool {
    line.strip_suffix(':').is_some_and(|name| {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_whitespace())
    })
}

/// Classify a single (untrimmed) line.
#[must_use]
pub fn classify(line: &str) -> Token {
    let line = line.trim();

    if line.starts_with('(') && line.ends_with(')') {
        Token::Comment(line.to_string())
    } else if is_speaker_header(line) {
        Token::SpeakerHeader(line[..line.len() - 1].trim().to_string())
    } else if line.is_empty() || line == ":" {
        Token::Blank
    } else {
        Token::Utterance(line.to_string())
    }
}

#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    text.lines().map(classify).collect()
}

/// Extract the ordered list of messages from a script.
///
/// Utterances that appear before the first speaker header have no speaker
/// and are dropped.
#[must_use]
pub fn extract(text: &str) -> Vec<Message> {
    let mut speaker: Option<String> = None;
    let mut messages = Vec::new();

    for token in tokenize(text) {
        match token {
            Token::SpeakerHeader(name) => speaker = Some(name),
            Token::Utterance(line) => {
                if let Some(speaker) = &speaker {
                    messages.push(Message::new(speaker.clone(), line));
                }
            }
            Token::Comment(_) | Token::Blank => {}
        }
    }

    messages
}

/// Read a script from disk and extract its messages.
///
/// # Errors
///
/// Returns [`ScriptError::NotFound`] if the file does not exist, and
/// [`ScriptError::Read`] for any other I/O or encoding failure.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Message>, ScriptError> {
    let path = path.as_ref();

    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ScriptError::NotFound(path.to_path_buf())
        } else {
            ScriptError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    Ok(extract(&text))
}
