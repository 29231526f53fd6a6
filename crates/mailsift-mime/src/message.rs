//! MIME message structure and handling.

use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_quoted_printable, decode_text};
use crate::error::{Error, Result};
use crate::header::Headers;

/// Nesting limit for multipart bodies; deeper parts are kept undivided.
const MAX_DEPTH: usize = 16;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }
}

/// A leaf MIME entity: headers plus still-encoded body bytes.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body (raw bytes, transfer-encoded).
    pub body: Vec<u8>,
}

impl Part {
    /// Creates a new part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Gets the content type, defaulting to `text/plain`.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        ContentType::parse_or_default(self.headers.get("content-type"))
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// Base64 bodies that fail to decode are returned as-is.
    #[must_use]
    pub fn decode_body(&self) -> Vec<u8> {
        match self.transfer_encoding() {
            TransferEncoding::Base64 => {
                decode_base64(&String::from_utf8_lossy(&self.body)).unwrap_or_else(|_| self.body.clone())
            }
            TransferEncoding::QuotedPrintable => decode_quoted_printable(&self.body),
            _ => self.body.clone(),
        }
    }

    /// Gets the decoded body as text: UTF-8, else Latin-1.
    ///
    /// The declared charset is ignored; mislabelled UTF-8 is common.
    #[must_use]
    pub fn body_text(&self) -> String {
        decode_text(&self.decode_body())
    }

    fn is_plain_text(&self) -> bool {
        self.content_type().is("text", "plain")
    }
}

/// MIME message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message headers.
    pub headers: Headers,
    /// Leaf parts in depth-first order (empty for single-part messages).
    pub parts: Vec<Part>,
    /// Body for single-part messages.
    pub body: Option<Vec<u8>>,
}

impl Message {
    /// Parses a raw RFC 5322 message.
    ///
    /// Parsing is lenient: malformed headers are skipped, a multipart body
    /// without a usable boundary is kept as a single body, and bytes that are
    /// not UTF-8 are read as Latin-1.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::Parse("empty message".to_string()));
        }

        let (header_bytes, body) = split_header_body(raw);
        let headers = Headers::parse(&decode_text(header_bytes));
        let content_type = ContentType::parse_or_default(headers.get("content-type"));

        if let Some(boundary) = content_type.boundary().filter(|_| content_type.is_multipart()) {
            let mut parts = Vec::new();
            collect_parts(body, boundary, 0, &mut parts);
            return Ok(Self {
                headers,
                parts,
                body: None,
            });
        }

        Ok(Self {
            headers,
            parts: Vec::new(),
            body: Some(body.to_vec()),
        })
    }

    /// Gets the content type, defaulting to `text/plain`.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        ContentType::parse_or_default(self.headers.get("content-type"))
    }

    /// Checks if this message was split into parts.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.body.is_none()
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("from")
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Gets the Message-ID header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("message-id")
    }

    /// Iterates over leaf entities depth-first.
    ///
    /// A single-part message yields itself as one part.
    #[must_use]
    pub fn walk(&self) -> Vec<Part> {
        match &self.body {
            Some(body) => vec![Part::new(self.headers.clone(), body.clone())],
            None => self.parts.clone(),
        }
    }

    /// Returns the message text.
    ///
    /// For multipart messages this is the first `text/plain` part, or `None`
    /// if there is none. A single-part message returns its decoded body
    /// whatever its content type.
    #[must_use]
    pub fn first_plain_text(&self) -> Option<String> {
        if self.is_multipart() {
            return self
                .parts
                .iter()
                .find(|p| p.is_plain_text())
                .map(Part::body_text);
        }
        self.walk().first().map(Part::body_text)
    }

    /// Returns every `text/plain` part concatenated (the whole decoded body
    /// for single-part messages).
    #[must_use]
    pub fn plain_text_concat(&self) -> String {
        if self.is_multipart() {
            return self
                .parts
                .iter()
                .filter(|p| p.is_plain_text())
                .map(Part::body_text)
                .collect();
        }
        self.first_plain_text().unwrap_or_default()
    }
}

/// Splits at the first empty line (CRLF or LF).
fn split_header_body(raw: &[u8]) -> (&[u8], &[u8]) {
    if raw.starts_with(b"\r\n") {
        return (&[], &raw[2..]);
    }
    if raw.starts_with(b"\n") {
        return (&[], &raw[1..]);
    }

    let crlf = find(raw, b"\r\n\r\n").map(|i| (i, i + 4));
    let lf = find(raw, b"\n\n").map(|i| (i, i + 2));
    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    match split {
        Some((end, start)) => (&raw[..end], &raw[start..]),
        None => (raw, &[]),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits a multipart body on its boundary and recurses into nested multiparts.
fn collect_parts(body: &[u8], boundary: &str, depth: usize, out: &mut Vec<Part>) {
    for chunk in split_multipart(body, boundary) {
        let (header_bytes, part_body) = split_header_body(chunk);
        let headers = Headers::parse(&decode_text(header_bytes));
        let ct = ContentType::parse_or_default(headers.get("content-type"));

        match ct.boundary().filter(|_| ct.is_multipart() && depth < MAX_DEPTH) {
            Some(inner) => collect_parts(part_body, inner, depth + 1, out),
            None => out.push(Part::new(headers, part_body.to_vec())),
        }
    }
}

/// Returns the body of each part between `--boundary` delimiter lines.
///
/// The line break preceding a delimiter belongs to the delimiter. The
/// preamble and epilogue are discarded.
fn split_multipart<'a>(body: &'a [u8], boundary: &str) -> Vec<&'a [u8]> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();
    let mut parts = Vec::new();
    let mut part_start: Option<usize> = None;
    let mut line_start = 0;

    while line_start < body.len() {
        let line_end = body[line_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(body.len(), |i| line_start + i);
        let next = (line_end + 1).min(body.len());
        let line = trim_line_end(&body[line_start..line_end]);

        if let Some(rest) = line.strip_prefix(delimiter) {
            let closing = rest.starts_with(b"--");
            if closing || rest.iter().all(u8::is_ascii_whitespace) {
                if let Some(start) = part_start {
                    let end = strip_trailing_newline(body, start, line_start);
                    parts.push(&body[start..end]);
                }
                if closing {
                    return parts;
                }
                part_start = Some(next);
            }
        }

        line_start = next.max(line_end + 1);
    }

    // Missing closing delimiter: keep what we have.
    if let Some(start) = part_start.filter(|&s| s < body.len()) {
        parts.push(&body[start..]);
    }
    parts
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn strip_trailing_newline(body: &[u8], start: usize, end: usize) -> usize {
    let mut end = end;
    if end > start && body[end - 1] == b'\n' {
        end -= 1;
        if end > start && body[end - 1] == b'\r' {
            end -= 1;
        }
    }
    end
}
