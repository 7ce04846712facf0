//! Console configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{Locale, UnsupportedLocale};

const DEFAULT_API_BASE_URL: &str = "http://sazasub.kohga.local/";

/// Errors raised when a configured value cannot be used.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The API base URL is not an absolute HTTP(S) URL.
    #[error("invalid api base url '{value}': {reason}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser or scheme complaint.
        reason: String,
    },
    /// A zero timeout was configured.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    /// The locale is not supported.
    #[error(transparent)]
    Locale(#[from] UnsupportedLocale),
}

/// Configuration values controlling how the console reaches the fleet API.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FLEET_CONSOLE")]
pub struct FleetConsoleSettings {
    /// Base URL of the fleet API server.
    pub api_base_url: Option<String>,
    /// Client-side request timeout in seconds; unset means wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Locale for user-facing messages (`ja` or `en`).
    pub locale: Option<String>,
    /// Emit logs as JSON lines instead of human-readable text.
    #[ortho_config(default = false)]
    pub log_json: bool,
    /// Override for the HTTP user-agent.
    pub user_agent: Option<String>,
}

impl FleetConsoleSettings {
    /// Return the API base URL, falling back to the default server.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] for unparsable or non-HTTP
    /// URLs.
    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL);
        let invalid = |reason: String| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            reason,
        };
        let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    /// Return the request timeout, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] when the timeout is zero.
    pub fn request_timeout(&self) -> Result<Option<Duration>, SettingsError> {
        match self.request_timeout_secs {
            Some(0) => Err(SettingsError::ZeroTimeout),
            Some(secs) => Ok(Some(Duration::from_secs(secs))),
            None => Ok(None),
        }
    }

    /// Return the message locale, falling back to Japanese.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Locale`] for unsupported locale tags.
    pub fn locale(&self) -> Result<Locale, SettingsError> {
        match self.locale.as_deref() {
            Some(tag) => Ok(tag.parse()?),
            None => Ok(Locale::default()),
        }
    }

    /// Return the configured user-agent override, if any.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}
