//! Endpoint configuration for the client.

use url::Url;

use crate::error::{Error, Result};

/// Endpoints the client talks to.
///
/// Defaults match a local development backend; embedders override via the
/// builder-style setters.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for REST calls, including the API prefix.
    pub api_base_url: String,
    /// Fixed websocket endpoint for the realtime feed.
    pub ws_url: String,
    /// Direct-upload endpoint for signed image uploads.
    pub upload_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api/v1".to_string(),
            ws_url: "ws://localhost:8080/api/v1/ws".to_string(),
            upload_url: "https://api.cloudinary.com/v1_1/dthdcnchy/image/upload".to_string(),
        }
    }
}

impl ClientConfig {
    /// Builds a config pointed at `api_base_url`, deriving the websocket
    /// endpoint from the same host.
    pub fn new(api_base_url: &str) -> Self {
        let base = api_base_url.trim_end_matches('/');
        let ws_url = format!(
            "{}/ws",
            base.replacen("https://", "wss://", 1)
                .replacen("http://", "ws://", 1)
        );
        Self {
            api_base_url: base.to_string(),
            ws_url,
            ..Self::default()
        }
    }

    /// Overrides the websocket endpoint.
    pub fn with_ws_url(mut self, ws_url: &str) -> Self {
        self.ws_url = ws_url.to_string();
        self
    }

    /// Overrides the direct-upload endpoint.
    pub fn with_upload_url(mut self, upload_url: &str) -> Self {
        self.upload_url = upload_url.to_string();
        self
    }

    /// Validates that all endpoints parse and carry the expected schemes.
    pub fn validate(&self) -> Result<()> {
        let api = Url::parse(&self.api_base_url)
            .map_err(|e| Error::Config(format!("invalid api_base_url: {e}")))?;
        if !matches!(api.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "api_base_url must be http(s), got {}",
                api.scheme()
            )));
        }
        let ws =
            Url::parse(&self.ws_url).map_err(|e| Error::Config(format!("invalid ws_url: {e}")))?;
        if !matches!(ws.scheme(), "ws" | "wss") {
            return Err(Error::Config(format!(
                "ws_url must be ws(s), got {}",
                ws.scheme()
            )));
        }
        Url::parse(&self.upload_url)
            .map_err(|e| Error::Config(format!("invalid upload_url: {e}")))?;
        Ok(())
    }
}
