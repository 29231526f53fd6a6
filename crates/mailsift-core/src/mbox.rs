//! Import of mbox archives (e.g. a Google Takeout export) into a [`Table`].

use std::path::{Path, PathBuf};

use mailsift_mime::Message;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::table::{Record, Table};

/// Headers copied from each message, in column order.
pub const HEADER_COLUMNS: &[&str] = &["X-Gmail-Labels", "Message-ID", "Subject", "From", "To"];

/// Column holding the concatenated `text/plain` body.
pub const BODY_COLUMN: &str = "body";

/// Where `import` writes unless told otherwise.
pub const DEFAULT_OUTPUT_PATH: &str = "data/processed/email_data.csv";

/// Splits mbox data into raw messages.
///
/// A message starts after each line beginning with `From `. Quoted
/// `>From ` lines lose one `>`. The blank line that separates messages is
/// not part of the message.
#[must_use]
pub fn split_mbox(data: &[u8]) -> Vec<Vec<u8>> {
    let mut messages = Vec::new();
    let mut current: Option<Vec<u8>> = None;

    for line in data.split_inclusive(|&b| b == b'\n') {
        if line.starts_with(b"From ") {
            if let Some(message) = current.take() {
                messages.push(finish_message(message));
            }
            current = Some(Vec::new());
            continue;
        }

        // Text before the first separator is not a message.
        let Some(message) = current.as_mut() else {
            continue;
        };
        message.extend_from_slice(unescape_from(line));
    }

    if let Some(message) = current {
        messages.push(finish_message(message));
    }
    messages
}

fn unescape_from(line: &[u8]) -> &[u8] {
    let quotes = line.iter().take_while(|&&b| b == b'>').count();
    if quotes > 0 && line[quotes..].starts_with(b"From ") {
        &line[1..]
    } else {
        line
    }
}

fn finish_message(mut message: Vec<u8>) -> Vec<u8> {
    for ending in [&b"\r\n"[..], b"\n"] {
        if message.ends_with(ending) {
            message.truncate(message.len() - ending.len());
            break;
        }
    }
    message
}

/// Turns one raw message into a row.
///
/// Returns `None` for messages with no content at all.
#[must_use]
pub fn message_record(raw: &[u8]) -> Option<Record> {
    let message = match Message::parse(raw) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "skipping unreadable mbox message");
            return None;
        }
    };

    let mut record: Record = HEADER_COLUMNS
        .iter()
        .map(|&name| {
            let value = message.headers.get_decoded(name).unwrap_or_default();
            (name.to_string(), value)
        })
        .collect();
    record.push((BODY_COLUMN.to_string(), message.plain_text_concat()));
    Some(record)
}

/// Reads every message of one mbox file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn read_mbox(path: &Path) -> Result<Table> {
    let data = std::fs::read(path)?;
    let raw_messages = split_mbox(&data);
    debug!(path = %path.display(), messages = raw_messages.len(), "split mbox");

    let records: Vec<Record> = raw_messages.iter().filter_map(|raw| message_record(raw)).collect();
    info!("Read {} messages from {}", records.len(), path.display());

    let mut table = Table::new(HEADER_COLUMNS.iter().copied().chain([BODY_COLUMN]));
    table.append(Table::from_records(records));
    Ok(table)
}

/// Reads several mbox files into one table and writes it as CSV.
///
/// # Errors
///
/// Returns an error if any file cannot be read or the output cannot be
/// written.
pub fn import_mbox_files(paths: &[PathBuf], output: &Path) -> Result<Table> {
    let mut combined = Table::new(HEADER_COLUMNS.iter().copied().chain([BODY_COLUMN]));
    for path in paths {
        combined.append(read_mbox(path)?);
    }

    combined.write_csv(output)?;
    info!(
        "Successfully saved {} emails to {}",
        combined.len(),
        output.display()
    );
    Ok(combined)
}
