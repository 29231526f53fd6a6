//! Mailbox export: Gmail messages to a [`Table`].

use std::collections::HashMap;

use mailsift_gmail::{ListQuery, MailApi, ME};
use mailsift_mime::Message as MimeMessage;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::labels::format_label_list;
use crate::table::{Record, Table};

/// Headers copied into the table unless told otherwise.
pub const DEFAULT_HEADER_COLUMNS: &[&str] = &["From", "To", "Subject", "Date"];

/// Name used for label IDs missing from the mailbox's label list.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// How often progress is logged at info level.
const PROGRESS_EVERY: usize = 50;

/// Fetches every message matching `query` into a table.
///
/// Columns are `Labels`, `Body`, `ID`, then each requested header in the
/// order first seen. Messages are fetched one at a time.
///
/// # Errors
///
/// Returns the first API error; a message whose raw body cannot be parsed
/// is kept with an empty `Body`.
pub async fn fetch_messages_as_table<A, S>(api: &A, query: &str, header_columns: &[S]) -> Result<Table>
where
    A: MailApi,
    S: AsRef<str>,
{
    let label_names = fetch_label_mapping(api).await?;

    let estimate = api
        .list_messages(ME, &ListQuery::new(query).with_max_results(1))
        .await?
        .result_size_estimate;
    info!("Estimated {estimate} messages for query: {query}");

    let mut records = Vec::new();
    let mut page_token = None;

    loop {
        let page = api
            .list_messages(ME, &ListQuery::new(query).with_page_token(page_token.take()))
            .await?;

        for message in &page.messages {
            records.push(fetch_record(api, &message.id, &label_names, header_columns).await?);
            if records.len() % PROGRESS_EVERY == 0 {
                info!("Fetched {} of ~{estimate} messages", records.len());
            }
        }

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    info!("Fetched {} messages", records.len());
    Ok(Table::from_records(records))
}

/// Maps label IDs to display names.
///
/// # Errors
///
/// Returns an error if the label list cannot be fetched.
pub async fn fetch_label_mapping<A: MailApi>(api: &A) -> Result<HashMap<String, String>> {
    let labels = api.list_labels(ME).await?;
    debug!(count = labels.len(), "fetched labels");
    Ok(labels.into_iter().map(|l| (l.id, l.name)).collect())
}

async fn fetch_record<A, S>(
    api: &A,
    id: &str,
    label_names: &HashMap<String, String>,
    header_columns: &[S],
) -> Result<Record>
where
    A: MailApi,
    S: AsRef<str>,
{
    let message = api.get_message(ME, id).await?;
    let raw = api.get_raw_message(ME, id).await?;
    debug!(id, bytes = raw.len(), "fetched message");

    let labels: Vec<&str> = message
        .label_ids
        .iter()
        .map(|label_id| label_names.get(label_id).map_or(UNKNOWN_LABEL, String::as_str))
        .collect();

    let body = match MimeMessage::parse(&raw) {
        Ok(mime) => mime.first_plain_text().unwrap_or_default(),
        Err(e) => {
            warn!(id, error = %e, "could not parse message body");
            String::new()
        }
    };

    let mut record: Record = vec![
        ("Labels".to_string(), format_label_list(&labels)),
        ("Body".to_string(), body),
        ("ID".to_string(), message.id.clone()),
    ];

    // A repeated header keeps its last value.
    for header in &message.payload.headers {
        if !header_columns.iter().any(|c| c.as_ref() == header.name) {
            continue;
        }
        match record.iter_mut().find(|(k, _)| *k == header.name) {
            Some((_, value)) => value.clone_from(&header.value),
            None => record.push((header.name.clone(), header.value.clone())),
        }
    }

    Ok(record)
}
