//! # mailsift-oauth
//!
//! `OAuth2` installed-application authentication for the Gmail API.
//!
//! ## Features
//!
//! - **Authorization Code Flow** with optional PKCE, including the
//!   out-of-band (copy/paste) redirect used by command-line tools
//! - **Token management**: refresh grants, expiration checking
//! - **Google file formats**: `credentials.json` client secrets and the
//!   authorized-user `token.json` written after consent
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsift_oauth::{AuthorizationCodeFlow, ClientSecrets, GMAIL_READONLY_SCOPE};
//!
//! let secrets = ClientSecrets::load("config/credentials.json")?;
//! let client = secrets.oauth_client(&[GMAIL_READONLY_SCOPE.to_string()])?
//!     .with_redirect_uri("urn:ietf:wg:oauth:2.0:oob");
//! let flow = AuthorizationCodeFlow::new(client);
//!
//! println!("Go to this URL to authorize the app: {}", flow.authorization_url(None, None)?);
//! let token = flow.exchange_code("code-from-consent-page", None).await?;
//! ```
//!
//! ### Loading a saved token
//!
//! ```ignore
//! use mailsift_oauth::AuthorizedUser;
//!
//! let mut user = AuthorizedUser::load("config/token.json")?;
//! let token = user.valid_token().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod files;
pub mod flow;
pub mod provider;
pub mod token;

pub use error::{Error, Result};
pub use files::{AuthorizedUser, ClientSecrets};
pub use flow::{AuthorizationCodeFlow, OAuthClient, PkceChallenge};
pub use provider::{GMAIL_READONLY_SCOPE, OOB_REDIRECT_URI, Provider};
pub use token::Token;
