//! MIME decoding utilities.
//!
//! Supports Base64 (standard and URL-safe alphabets), Quoted-Printable,
//! RFC 2047 encoded words, and charset conversion with a Latin-1 fallback.

use crate::error::Result;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Standard alphabet, padding optional.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// URL-safe alphabet, padding optional.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes Base64 data, ignoring embedded whitespace and missing padding.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    LENIENT_STANDARD.decode(cleaned).map_err(Into::into)
}

/// Decodes URL-safe Base64 as used by the Gmail API `raw` message format.
///
/// # Errors
///
/// Returns an error if the input is not valid URL-safe Base64.
pub fn decode_base64_url(data: &str) -> Result<Vec<u8>> {
    LENIENT_URL_SAFE.decode(data.trim()).map_err(Into::into)
}

/// Decodes Quoted-Printable bytes (RFC 2045).
///
/// Malformed escapes are kept literally rather than rejected, matching
/// what mail readers do with broken senders.
#[must_use]
pub fn decode_quoted_printable(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        let byte = data[i];
        if byte != b'=' {
            out.push(byte);
            i += 1;
            continue;
        }

        // Soft line break: "=\r\n" or "=\n", optionally preceded by trailing spaces.
        let mut j = i + 1;
        while j < data.len() && (data[j] == b' ' || data[j] == b'\t') {
            j += 1;
        }
        if data.get(j) == Some(&b'\n') {
            i = j + 1;
            continue;
        }
        if data.get(j) == Some(&b'\r') && data.get(j + 1) == Some(&b'\n') {
            i = j + 2;
            continue;
        }

        match (
            data.get(i + 1).copied().and_then(hex_value),
            data.get(i + 2).copied().and_then(hex_value),
        ) {
            (Some(hi), Some(lo)) => {
                out.push((hi << 4) | lo);
                i += 3;
            }
            _ => {
                out.push(b'=');
                i += 1;
            }
        }
    }

    out
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decodes bytes as UTF-8, falling back to Latin-1.
///
/// Latin-1 maps every byte to a character, so this never fails.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => decode_latin1(bytes),
    }
}

/// Decodes bytes as ISO-8859-1.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Decodes bytes in a declared charset.
///
/// Used for RFC 2047 words, where the charset travels with the text. The
/// Latin-1 family is decoded exactly; any other charset goes through
/// [`decode_text`]. Message bodies use [`decode_text`] directly.
#[must_use]
pub fn decode_charset(bytes: &[u8], charset: Option<&str>) -> String {
    match charset.map(str::to_ascii_lowercase).as_deref() {
        Some("iso-8859-1" | "latin1" | "latin-1" | "l1" | "windows-1252" | "cp1252") => {
            decode_latin1(bytes)
        }
        _ => decode_text(bytes),
    }
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Format of a word: `=?charset?encoding?encoded-text?=`. Whitespace between
/// two adjacent encoded words is dropped; text outside encoded words is kept
/// as is. Words that fail to decode are left untouched.
#[must_use]
pub fn decode_rfc2047(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut pending_space = String::new();
    let mut last_was_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);

        let Some((decoded, consumed)) = decode_encoded_word(candidate) else {
            out.push_str(&pending_space);
            pending_space.clear();
            out.push_str(before);
            out.push_str("=?");
            rest = &candidate[2..];
            last_was_word = false;
            continue;
        };

        if last_was_word && before.chars().all(char::is_whitespace) {
            // Separator between two encoded words.
        } else {
            out.push_str(&pending_space);
            out.push_str(before);
        }
        pending_space.clear();
        out.push_str(&decoded);
        rest = &candidate[consumed..];
        last_was_word = true;

        let trimmed = rest.trim_start();
        if trimmed.starts_with("=?") {
            pending_space = rest[..rest.len() - trimmed.len()].to_string();
            rest = trimmed;
        }
    }

    out.push_str(&pending_space);
    out.push_str(rest);
    out
}

/// Decodes one encoded word at the start of `s`; returns it and its length.
fn decode_encoded_word(s: &str) -> Option<(String, usize)> {
    let inner = s.strip_prefix("=?")?;
    let (charset, after_charset) = inner.split_once('?')?;
    let (encoding, after_encoding) = after_charset.split_once('?')?;
    let end = after_encoding.find("?=")?;
    let payload = &after_encoding[..end];
    if payload.contains(char::is_whitespace) {
        return None;
    }

    // RFC 2231 language suffix: charset*lang
    let charset = charset.split('*').next().unwrap_or(charset);

    let bytes = match encoding {
        "B" | "b" => decode_base64(payload).ok()?,
        "Q" | "q" => decode_quoted_printable(payload.replace('_', " ").as_bytes()),
        _ => return None,
    };

    let consumed = s.len() - after_encoding.len() + end + 2;
    Some((decode_charset(&bytes, Some(charset)), consumed))
}
