//! Google credential file formats.
//!
//! Two JSON documents are involved in the installed-app flow:
//!
//! - `credentials.json`: the OAuth client downloaded from the Google Cloud
//!   console, with an `installed` (desktop) or `web` section.
//! - `token.json`: the authorized-user record written after consent. It
//!   uses the same field names as Google's own client libraries so files
//!   produced by either side can be shared.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::flow::OAuthClient;
use crate::provider::Provider;
use crate::token::Token;

/// Default token endpoint when a file does not name one.
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth client section of `credentials.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Client ID.
    pub client_id: String,
    /// Client secret.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Authorization endpoint.
    #[serde(default)]
    pub auth_uri: Option<String>,
    /// Token endpoint.
    #[serde(default)]
    pub token_uri: Option<String>,
    /// Registered redirect URIs.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// Contents of a Google `credentials.json` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSecrets {
    /// Desktop application client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<ClientConfig>,
    /// Web application client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<ClientConfig>,
}

impl ClientSecrets {
    /// Reads client secrets from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not valid JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let secrets: Self = serde_json::from_str(&contents)?;
        secrets.client()?;
        debug!("Loaded client secrets from {}", path.display());
        Ok(secrets)
    }

    /// Returns the client configuration, preferring the `installed` section.
    ///
    /// # Errors
    ///
    /// Returns an error if neither section is present.
    pub fn client(&self) -> Result<&ClientConfig> {
        self.installed.as_ref().or(self.web.as_ref()).ok_or_else(|| {
            Error::InvalidConfig("client secrets contain neither 'installed' nor 'web'".into())
        })
    }

    /// Builds an [`OAuthClient`] for the given scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the client section is missing or its URLs are invalid.
    pub fn oauth_client(&self, scopes: &[String]) -> Result<OAuthClient> {
        let config = self.client()?;
        let google = Provider::google()?;
        let auth_url = config
            .auth_uri
            .as_deref()
            .unwrap_or_else(|| google.auth_url.as_str());
        let token_url = config.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);

        let provider =
            Provider::new(google.name, auth_url, token_url)?.with_default_scopes(scopes.to_vec());
        provider.validate()?;

        let mut client = OAuthClient::new(&config.client_id, provider);
        if let Some(secret) = &config.client_secret {
            client = client.with_client_secret(secret);
        }
        Ok(client)
    }
}

/// Contents of an authorized-user `token.json` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    /// Current access token.
    #[serde(default)]
    pub token: Option<String>,
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// Client ID the token was issued to.
    pub client_id: String,
    /// Client secret.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Access token expiry (UTC).
    #[serde(default, with = "expiry_format")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl AuthorizedUser {
    /// Builds a record from a freshly issued token.
    #[must_use]
    pub fn from_token(client: &OAuthClient, token: &Token, scopes: &[String]) -> Self {
        let granted = token.scopes();
        Self {
            token: Some(token.access_token.clone()),
            refresh_token: token.refresh_token.clone(),
            token_uri: client.provider.token_url.to_string(),
            client_id: client.client_id.clone(),
            client_secret: client.client_secret.clone(),
            scopes: if granted.is_empty() {
                scopes.to_vec()
            } else {
                granted
            },
            expiry: token.expires_at,
        }
    }

    /// Reads a token file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the file does not exist, or a JSON
    /// error if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let user: Self = serde_json::from_str(&contents)?;
        debug!(
            "Loaded token for client {} from {}",
            user.client_id,
            path.display()
        );
        Ok(user)
    }

    /// Writes the token file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Token saved to {}", path.display());
        Ok(())
    }

    /// Returns true if every scope in `required` was granted.
    #[must_use]
    pub fn has_scopes(&self, required: &[String]) -> bool {
        required.iter().all(|s| self.scopes.contains(s))
    }

    /// Returns the stored access token as a [`Token`].
    #[must_use]
    pub fn to_token(&self) -> Option<Token> {
        let access = self.token.as_ref()?;
        let mut token = Token::new(access, "Bearer").with_scopes(&self.scopes);
        token.expires_at = self.expiry;
        token.refresh_token.clone_from(&self.refresh_token);
        Some(token)
    }

    /// Returns true if the stored access token exists and has not expired.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.to_token().is_some_and(|t| t.is_valid())
    }

    /// Builds an [`OAuthClient`] able to refresh this token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token URI is invalid.
    pub fn oauth_client(&self) -> Result<OAuthClient> {
        let google = Provider::google()?;
        let provider = Provider::new(google.name, google.auth_url.as_str(), &self.token_uri)?
            .with_default_scopes(self.scopes.clone());
        provider.validate()?;
        let mut client = OAuthClient::new(&self.client_id, provider);
        if let Some(secret) = &self.client_secret {
            client = client.with_client_secret(secret);
        }
        Ok(client)
    }

    /// Refreshes the access token and updates this record in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRefreshToken`] if no refresh token is stored, or
    /// the token endpoint's error.
    pub async fn refresh(&mut self) -> Result<Token> {
        let refresh = self.refresh_token.clone().ok_or(Error::NoRefreshToken)?;
        let current = self
            .to_token()
            .unwrap_or_else(|| Token::new("", "Bearer").with_scopes(&self.scopes))
            .with_refresh_token(refresh);

        let refreshed = self.oauth_client()?.refresh_token(&current).await?;
        self.token = Some(refreshed.access_token.clone());
        self.expiry = refreshed.expires_at;
        self.refresh_token.clone_from(&refreshed.refresh_token);
        info!("Access token refreshed");
        Ok(refreshed)
    }

    /// Returns a usable access token, refreshing it first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is expired and cannot be refreshed.
    pub async fn valid_token(&mut self) -> Result<Token> {
        match self.to_token() {
            Some(token) if token.is_valid() => Ok(token),
            _ => self.refresh().await,
        }
    }
}

/// Expiry timestamps as written by Google's client libraries:
/// naive UTC with microseconds and a trailing `Z`.
mod expiry_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        super::parse_expiry(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid expiry: {raw}")))
    }
}

/// Accepts RFC 3339 and Google's naive `...Z` form with or without fractions.
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let trimmed = raw.trim_end_matches('Z');
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
}
