//! # mailsift-mime
//!
//! Lenient MIME parsing for pulling readable text and sender details out of
//! raw email.
//!
//! ## Features
//!
//! - **Message parsing**: RFC 5322 headers and nested multipart bodies
//! - **Decoding**: Base64, Quoted-Printable, RFC 2047 encoded words
//! - **Charsets**: UTF-8 with a Latin-1 fallback
//! - **Addresses**: display name / address split of `From` and `To` values
//!
//! ## Quick Start
//!
//! ```
//! use mailsift_mime::{Message, parse_address};
//!
//! let raw = b"From: Jane <jane@example.com>\r\n\
//!             Subject: Test\r\n\
//!             \r\n\
//!             Hello, World!";
//!
//! let message = Message::parse(raw).unwrap();
//! assert_eq!(message.subject(), Some("Test"));
//! assert_eq!(message.first_plain_text().as_deref(), Some("Hello, World!"));
//!
//! let from = parse_address(message.from().unwrap_or_default());
//! assert_eq!(from.email, "jane@example.com");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use address::{Address, parse_address};
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parse_never_panics(raw in proptest::collection::vec(any::<u8>(), 0..512)) {
            if let Ok(message) = Message::parse(&raw) {
                let _ = message.first_plain_text();
                let _ = message.plain_text_concat();
            }
        }

        #[test]
        fn parse_address_never_panics(value in ".{0,128}") {
            let _ = parse_address(&value);
        }

        #[test]
        fn rfc2047_plain_text_is_identity(value in "[a-zA-Z0-9 .,<>@]{0,64}") {
            prop_assert_eq!(encoding::decode_rfc2047(&value), value);
        }
    }
}
