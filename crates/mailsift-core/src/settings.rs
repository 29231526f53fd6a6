//! Optional user settings file.
//!
//! `settings.json` under the platform config directory can change the
//! defaults of command-line options. Every field is optional; flags given
//! on the command line always take precedence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Settings file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Authorized-user token file.
    pub token_path: Option<PathBuf>,
    /// OAuth client secrets file.
    pub credentials_path: Option<PathBuf>,
    /// Columns searched by `filter`.
    pub filter_columns: Option<Vec<String>>,
    /// Keywords matched by `filter`.
    pub filter_keywords: Option<Vec<String>>,
    /// Keywords excluded by `filter`.
    pub exclude_keywords: Option<Vec<String>>,
    /// Label used by `transform`.
    pub label_name: Option<String>,
}

impl Settings {
    /// Default location: `<config dir>/mailsift/settings.json`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailsift")
            .join("settings.json")
    }

    /// Reads settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Reads settings, falling back to defaults when the file is unusable.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                debug!(path = %path.display(), "settings loaded");
                settings
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {e}");
                Self::default()
            }
        }
    }
}
