//! Services that talk to the mailbox.

pub mod fetch;

pub use fetch::{
    DEFAULT_HEADER_COLUMNS, UNKNOWN_LABEL, fetch_label_mapping, fetch_messages_as_table,
};
