//! # mailsift-gmail
//!
//! Minimal read-only client for the Gmail REST API v1.
//!
//! Covers the calls needed to export a mailbox: `users.labels.list`,
//! `users.messages.list` (paged) and `users.messages.get` in the default and
//! `raw` formats.
//!
//! ## Example
//!
//! ```ignore
//! use mailsift_gmail::{GmailClient, ListQuery, ME};
//!
//! let client = GmailClient::new(access_token);
//! let page = client.list_messages(ME, &ListQuery::new("label:JOB")).await?;
//! for message in page.messages {
//!     let raw = client.get_raw_message(ME, &message.id).await?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod api;
mod client;
mod error;
mod types;

pub use api::MailApi;
pub use client::{GMAIL_API_BASE, GmailClient, ME};
pub use error::{Error, Result};
pub use types::{Header, Label, ListQuery, Message, MessageList, MessageRef, Payload};
