use std::fmt;

/// A single line of dialogue, ready to be delivered.
///
/// Messages are immutable once extracted; their identity is their position
/// in the extracted sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    speaker: String,
    text: String,
}

impl Message {
    #[must_use]
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The body delivered for this message, `"{speaker}: {text}"`.
    #[must_use]
    pub fn body(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}
