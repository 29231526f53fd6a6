//! The read-only mailbox operations the fetch pipeline needs.

use crate::error::Result;
use crate::types::{Label, ListQuery, Message, MessageList};

/// Read access to a Gmail-style mailbox.
///
/// [`GmailClient`](crate::GmailClient) talks to the real API; tests plug in
/// an in-memory implementation.
#[allow(async_fn_in_trait)]
pub trait MailApi {
    /// Lists every label.
    async fn list_labels(&self, user_id: &str) -> Result<Vec<Label>>;

    /// Fetches one page of message references.
    async fn list_messages(&self, user_id: &str, query: &ListQuery) -> Result<MessageList>;

    /// Fetches label IDs and headers of one message.
    async fn get_message(&self, user_id: &str, id: &str) -> Result<Message>;

    /// Fetches the raw RFC 2822 bytes of one message.
    async fn get_raw_message(&self, user_id: &str, id: &str) -> Result<Vec<u8>>;
}
