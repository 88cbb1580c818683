//! SMTP response parsing and representation.

use super::error::{ClientError, Result};

/// Represents a single line in an SMTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseLine {
    /// The SMTP status code (e.g., 220, 250, 550).
    pub code: u16,
    /// Whether this is the last line in a multi-line response.
    pub is_last: bool,
    /// The message text following the status code.
    pub message: String,
}

/// Represents a complete SMTP response, which may be multi-line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The SMTP status code.
    pub code: u16,
    /// All message lines in the response.
    pub lines: Vec<String>,
}

impl Response {
    #[must_use]
    pub const fn new(code: u16, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    /// Returns the complete message as a single string with lines joined by newlines.
    #[must_use]
    pub fn message(&self) -> String {
        self.lines.join("\n")
    }

    /// 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// 3xx, e.g. `354` after DATA or `334` during AUTH.
    #[must_use]
    pub const fn is_intermediate(&self) -> bool {
        self.code >= 300 && self.code < 400
    }

    /// 4xx
    #[must_use]
    pub const fn is_temporary_error(&self) -> bool {
        self.code >= 400 && self.code < 500
    }

    /// 5xx
    #[must_use]
    pub const fn is_permanent_error(&self) -> bool {
        self.code >= 500 && self.code < 600
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.is_temporary_error() || self.is_permanent_error()
    }

    /// The extension keywords advertised in an EHLO reply.
    ///
    /// The first line is the server's greeting and is skipped; each remaining
    /// line yields its upper-cased keyword with any parameters.
    #[must_use]
    pub fn capabilities(&self) -> Vec<String> {
        self.lines
            .iter()
            .skip(1)
            .map(|line| line.trim().to_ascii_uppercase())
            .collect()
    }

    /// Whether an EHLO reply advertises `keyword`.
    #[must_use]
    pub fn supports(&self, keyword: &str) -> bool {
        self.capabilities().iter().any(|capability| {
            capability
                .split_whitespace()
                .next()
                .is_some_and(|k| k.eq_ignore_ascii_case(keyword))
        })
    }

    /// SASL mechanisms listed on the `AUTH` line of an EHLO reply.
    #[must_use]
    pub fn auth_mechanisms(&self) -> Vec<String> {
        self.capabilities()
            .iter()
            .filter_map(|capability| {
                capability
                    .strip_prefix("AUTH ")
                    .or_else(|| capability.strip_prefix("AUTH="))
            })
            .flat_map(|mechanisms| mechanisms.split_whitespace().map(str::to_string))
            .collect()
    }

    fn into_error(self) -> ClientError {
        if self.is_error() {
            ClientError::SmtpError {
                code: self.code,
                message: self.message(),
            }
        } else {
            ClientError::UnexpectedResponse {
                code: self.code,
                message: self.message(),
            }
        }
    }

    /// Passes a 2xx reply through, converting anything else into an error.
    ///
    /// # Errors
    ///
    /// [`ClientError::SmtpError`] for 4xx and 5xx replies,
    /// [`ClientError::UnexpectedResponse`] for any other code.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }

    /// Passes a 3xx reply through, converting anything else into an error.
    ///
    /// # Errors
    ///
    /// [`ClientError::SmtpError`] for 4xx and 5xx replies,
    /// [`ClientError::UnexpectedResponse`] for any other code.
    pub fn ensure_intermediate(self) -> Result<Self> {
        if self.is_intermediate() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }

    /// Parses a single response line (without its line terminator).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ParseError` if the line doesn't match SMTP format.
    pub fn parse_line(line: &str) -> Result<ResponseLine> {
        let code = line
            .get(..3)
            .filter(|code| code.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| ClientError::ParseError(format!("Invalid status line: '{line}'")))?
            .parse::<u16>()
            .map_err(|e| ClientError::ParseError(format!("Invalid status code: {e}")))?;

        let is_last = match line.as_bytes().get(3) {
            None | Some(b' ') => true,
            Some(b'-') => false,
            Some(c) => {
                return Err(ClientError::ParseError(format!(
                    "Invalid separator character: '{}'",
                    char::from(*c)
                )));
            }
        };

        Ok(ResponseLine {
            code,
            is_last,
            message: line.get(4..).unwrap_or_default().to_string(),
        })
    }

    /// Parses a complete multi-line SMTP response from the start of a buffer.
    ///
    /// Returns the parsed `Response` and the number of bytes consumed, or
    /// `None` if the buffer does not yet hold a complete response.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::ParseError` if the response is malformed.
    pub fn parse_response(buffer: &[u8]) -> Result<Option<(Self, usize)>> {
        let mut consumed = 0;
        let mut code = None;
        let mut lines = Vec::new();

        while let Some(end) = buffer[consumed..].iter().position(|&b| b == b'\n') {
            let raw = &buffer[consumed..consumed + end];
            consumed += end + 1;

            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            if raw.is_empty() {
                continue;
            }

            let parsed = Self::parse_line(std::str::from_utf8(raw)?)?;

            match code {
                Some(expected) if expected != parsed.code => {
                    return Err(ClientError::ParseError(format!(
                        "Status code mismatch in multi-line response: expected {expected}, got {}",
                        parsed.code
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed.code),
            }

            lines.push(parsed.message);

            if parsed.is_last {
                return Ok(Some((Self::new(parsed.code, lines), consumed)));
            }
        }

        Ok(None)
    }
}
