//! # mailsift-core
//!
//! Core logic for `mailsift`.
//!
//! This crate provides:
//! - An in-memory email [`Table`] with CSV persistence
//! - Keyword filtering and label transforms over that table
//! - Gmail export through any [`mailsift_gmail::MailApi`]
//! - Gmail search query construction
//! - mbox archive import
//! - The optional user settings file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod filters;
pub mod input;
pub mod labels;
pub mod mbox;
pub mod query;
pub mod service;
pub mod settings;
pub mod table;

pub use error::{Error, Result};
pub use filters::{extract_job_application_rows, transform_dataframe};
pub use input::{load_email_data, require_columns, validate_input_file};
pub use labels::{format_label_list, parse_label_list};
pub use mbox::import_mbox_files;
pub use query::QueryOptions;
pub use service::fetch_messages_as_table;
pub use settings::Settings;
pub use table::{Record, Table};
