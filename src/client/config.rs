use std::time::Duration;

use crate::client::backoff::ReconnectPolicy;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Client configuration: endpoints plus presence connection behaviour.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    app: AppConfig,
    reconnect: ReconnectPolicy,
    auth_frame: bool,
    request_timeout: Duration,
}

impl ClientConfig {
    /// Configuration from `CLIENT_API_URL` / `CLIENT_WS_URL`, falling back to
    /// a local server.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url =
            std::env::var("CLIENT_API_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        let mut builder = AppConfig::builder().server_url(server_url);
        if let Ok(ws_url) = std::env::var("CLIENT_WS_URL") {
            builder = builder.ws_url(ws_url);
        }
        let mut config = Self::with_builder(builder)?;
        config.auth_frame = std::env::var("CLIENT_AUTH_FRAME").unwrap_or_default() == "1";
        Ok(config)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
            reconnect: ReconnectPolicy::default(),
            auth_frame: false,
            request_timeout: Duration::from_secs(30),
        })
    }

    /// Replace the reconnect policy
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Also send `{"type":"AUTH"}` as the first frame after every open
    pub fn with_auth_frame(mut self, enabled: bool) -> Self {
        self.auth_frame = enabled;
        self
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        self.app.api_url(path)
    }

    pub fn reconnect(&self) -> ReconnectPolicy {
        self.reconnect
    }

    pub fn auth_frame(&self) -> bool {
        self.auth_frame
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Presence socket URL carrying the session credential as `token`
    pub fn presence_url(&self, token: &str) -> String {
        let mut url = self.app.ws_url.clone();
        url.query_pairs_mut().append_pair("token", token);
        url.to_string()
    }
}
