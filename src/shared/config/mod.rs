//! Application configuration module
//!
//! Endpoint configuration shared by every client of the platform: where the
//! REST API lives and where the presence socket lives.

use thiserror::Error;
use url::Url;

/// Application endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the REST API, e.g. `http://127.0.0.1:3000`
    pub server_url: Url,
    /// Presence socket URL, e.g. `ws://127.0.0.1:3000/ws`
    pub ws_url: Url,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Full URL for an API path
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url.as_str().trim_end_matches('/'), path)
    }
}

/// Builder for AppConfig
///
/// When no socket URL is given it is derived from the server URL by swapping
/// the scheme (`http` → `ws`, `https` → `wss`) and appending `/ws`.
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    ws_url: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the presence socket URL
    pub fn ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = Some(url.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let raw_server = self.server_url.ok_or(ConfigError::MissingValue("server_url"))?;
        let server_url = parse_with_schemes(&raw_server, &["http", "https"])?;

        let ws_url = match self.ws_url {
            Some(raw) => parse_with_schemes(&raw, &["ws", "wss"])?,
            None => derive_ws_url(&server_url)?,
        };

        Ok(AppConfig { server_url, ws_url })
    }
}

fn parse_with_schemes(raw: &str, schemes: &[&str]) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::InvalidUrl(format!(
            "{}: scheme must be one of {:?}",
            raw, schemes
        )));
    }
    Ok(url)
}

fn derive_ws_url(server_url: &Url) -> Result<Url, ConfigError> {
    let scheme = if server_url.scheme() == "https" { "wss" } else { "ws" };
    let rest = &server_url.as_str()[server_url.scheme().len()..];
    let raw = format!("{}{}/ws", scheme, rest.trim_end_matches('/'));
    parse_with_schemes(&raw, &["ws", "wss"])
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to read config file: {0}")]
    Io(String),
}
