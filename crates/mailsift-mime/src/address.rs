//! Email address parsing.
//!
//! Splits a `From`/`To` header value into display name and address part.
//! The parser is forgiving: it never fails, and returns empty fields when
//! nothing usable is found.

use crate::encoding::decode_rfc2047;

/// A parsed mailbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Display name, RFC 2047 decoded (may be empty).
    pub name: String,
    /// Address part (may be empty).
    pub email: String,
}

impl Address {
    /// Creates an address.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns true if neither a name nor an address was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

/// Parses the first mailbox of a header value.
///
/// Handles `Name <addr>`, `"Quoted, Name" <addr>`, `addr (Comment)` and bare
/// `addr`. When a value lists several mailboxes only the first is returned.
#[must_use]
pub fn parse_address(value: &str) -> Address {
    let first = first_mailbox(value.trim());
    if first.is_empty() {
        return Address::default();
    }

    let (text, comment) = strip_comments(first);

    if let Some(open) = text.find('<') {
        let close = text[open..].find('>').map(|i| open + i);
        let Some(close) = close else {
            return Address::default();
        };
        let email = text[open + 1..close].trim();
        let email = strip_route(email);
        let mut name = unquote(text[..open].trim());
        if name.is_empty() {
            name = comment;
        }
        return Address::new(decode_rfc2047(&name), email);
    }

    let email: String = text.split_whitespace().collect();
    if email.starts_with('"') {
        return Address::new(decode_rfc2047(&unquote(&email)), "");
    }
    Address::new(decode_rfc2047(&comment), email)
}

/// Returns the text up to the first top-level comma.
fn first_mailbox(value: &str) -> &str {
    let mut in_quotes = false;
    let mut in_angle = false;
    let mut depth = 0_u32;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' if depth == 0 => in_quotes = !in_quotes,
            '(' if !in_quotes => depth += 1,
            ')' if !in_quotes => depth = depth.saturating_sub(1),
            '<' if !in_quotes && depth == 0 => in_angle = true,
            '>' if !in_quotes && depth == 0 => in_angle = false,
            ',' if !in_quotes && !in_angle && depth == 0 => return value[..i].trim(),
            _ => {}
        }
    }
    value
}

/// Removes `(comments)` outside quotes; returns the remaining text and the
/// first comment's content.
fn strip_comments(value: &str) -> (String, String) {
    let mut text = String::with_capacity(value.len());
    let mut comment = String::new();
    let mut first_comment: Option<String> = None;
    let mut in_quotes = false;
    let mut depth = 0_u32;
    let mut escaped = false;

    for c in value.chars() {
        if escaped {
            if depth > 0 {
                comment.push(c);
            } else {
                text.push(c);
            }
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes || depth > 0 => {
                if depth == 0 {
                    text.push(c);
                }
                escaped = true;
            }
            '"' if depth == 0 => {
                in_quotes = !in_quotes;
                text.push(c);
            }
            '(' if !in_quotes => {
                if depth > 0 {
                    comment.push(c);
                }
                depth += 1;
            }
            ')' if !in_quotes && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if first_comment.is_none() {
                        first_comment = Some(comment.trim().to_string());
                    }
                    comment.clear();
                    text.push(' ');
                } else {
                    comment.push(c);
                }
            }
            _ if depth > 0 => comment.push(c),
            _ => text.push(c),
        }
    }

    (text.trim().to_string(), first_comment.unwrap_or_default())
}

/// Drops an obsolete source route (`@a,@b:user@host`).
fn strip_route(email: &str) -> String {
    let email = if email.starts_with('@') {
        email.split_once(':').map_or(email, |(_, rest)| rest)
    } else {
        email
    };
    email.split_whitespace().collect()
}

fn unquote(value: &str) -> String {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .map_or_else(
            || trimmed.to_string(),
            |v| v.replace("\\\"", "\"").replace("\\\\", "\\"),
        )
}
