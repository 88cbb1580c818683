//! Plain-text email message builder.

use std::fmt::Write;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};

use super::error::{ClientError, Result};

/// Builder for constructing plain-text email messages.
///
/// # Examples
///
/// ```
/// use cadence_smtp::client::MessageBuilder;
///
/// let message = MessageBuilder::new()
///     .from("sender@example.com")
///     .to("recipient@example.com")
///     .subject("Hello")
///     .body("This is the message body")
///     .build()
///     .unwrap();
///
/// assert!(message.contains("Subject: Hello\r\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: Option<String>,
    to: Vec<String>,
    subject: Option<String>,
    date: Option<DateTime<Utc>>,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl MessageBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from(mut self, email: impl Into<String>) -> Self {
        self.from = Some(email.into());
        self
    }

    /// Adds a recipient to the To header.
    #[must_use]
    pub fn to(mut self, email: impl Into<String>) -> Self {
        self.to.push(email.into());
        self
    }

    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the Date header. Defaults to the time of [`build`](Self::build).
    #[must_use]
    pub const fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Adds a custom header, emitted after the standard ones in insertion order.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, content: impl Into<String>) -> Self {
        self.body = Some(content.into());
        self
    }

    /// Builds the final message with CRLF line endings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::BuilderError`] if no recipient was given, or if
    /// a header name or value contains a line break.
    pub fn build(self) -> Result<String> {
        if self.to.is_empty() {
            return Err(ClientError::BuilderError(
                "Message has no recipients".to_string(),
            ));
        }

        let mut message = String::with_capacity(512);
        let date = self.date.unwrap_or_else(Utc::now);

        write_header(&mut message, "Date", &date.to_rfc2822())?;
        if let Some(from) = &self.from {
            write_header(&mut message, "From", from)?;
        }
        write_header(&mut message, "To", &self.to.join(", "))?;
        if let Some(subject) = &self.subject {
            write_header(&mut message, "Subject", &encode_word(subject))?;
        }
        for (name, value) in &self.headers {
            write_header(&mut message, name, value)?;
        }
        write_header(&mut message, "MIME-Version", "1.0")?;
        write_header(&mut message, "Content-Type", "text/plain; charset=utf-8")?;
        write_header(&mut message, "Content-Transfer-Encoding", "8bit")?;

        message.push_str("\r\n");

        if let Some(body) = &self.body {
            for line in body.lines() {
                message.push_str(line);
                message.push_str("\r\n");
            }
        }

        Ok(message)
    }
}

fn write_header(message: &mut String, name: &str, value: &str) -> Result<()> {
    if [name, value]
        .iter()
        .any(|part| part.contains(['\r', '\n']))
    {
        return Err(ClientError::BuilderError(format!(
            "Header {name} contains a line break"
        )));
    }

    write!(message, "{name}: {value}\r\n")
        .map_err(|e| ClientError::BuilderError(e.to_string()))
}

/// RFC 2047 encoded-word for header values that are not plain ASCII.
fn encode_word(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?utf-8?B?{}?=", STANDARD.encode(value))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn builds_headers_and_body() {
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let message = MessageBuilder::new()
            .from("bot@example.com")
            .to("reader@example.com")
            .subject("Cadence [beef] 1704164645")
            .date(date)
            .header("X-Speaker", "ALICE")
            .body("ALICE: Good morning.\nSecond line")
            .build()
            .unwrap();

        let parsed = mailparse::parse_mail(message.as_bytes()).unwrap();
        let header = |name: &str| {
            parsed
                .headers
                .iter()
                .find(|h| h.get_key().eq_ignore_ascii_case(name))
                .map(mailparse::MailHeader::get_value)
        };

        assert_eq!(header("From").as_deref(), Some("bot@example.com"));
        assert_eq!(header("To").as_deref(), Some("reader@example.com"));
        assert_eq!(
            header("Subject").as_deref(),
            Some("Cadence [beef] 1704164645")
        );
        assert_eq!(header("X-Speaker").as_deref(), Some("ALICE"));
        assert_eq!(
            mailparse::dateparse(&header("Date").unwrap()).unwrap(),
            1_704_164_645
        );
        assert_eq!(
            parsed.get_body().unwrap().trim_end(),
            "ALICE: Good morning.\r\nSecond line"
        );
    }

    #[test]
    fn non_ascii_subject_is_encoded() {
        let message = MessageBuilder::new()
            .to("reader@example.com")
            .subject("Bonne journée")
            .build()
            .unwrap();

        let parsed = mailparse::parse_mail(message.as_bytes()).unwrap();
        let subject = parsed
            .headers
            .iter()
            .find(|h| h.get_key() == "Subject")
            .unwrap()
            .get_value();
        assert_eq!(subject, "Bonne journée");
    }

    #[test]
    fn rejects_header_injection() {
        let result = MessageBuilder::new()
            .to("reader@example.com")
            .subject("Hi\r\nBcc: someone@example.com")
            .build();

        assert!(matches!(result, Err(ClientError::BuilderError(_))));
    }

    #[test]
    fn requires_recipient() {
        assert!(MessageBuilder::new().body("hi").build().is_err());
    }
}
