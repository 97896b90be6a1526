//! Error types shared across the client.

use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified client error.
#[derive(Debug, Error)]
pub enum Error {
    /// The bearer credential was rejected; the session has already been
    /// invalidated by the time this surfaces.
    #[error("unauthorized: session invalidated")]
    Unauthorized,

    /// Non-2xx API response with the server-provided message when the body
    /// carried one.
    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("websocket: {0}")]
    Websocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A realtime send was attempted while the transport was not Open.
    #[error("realtime transport is not connected")]
    RealtimeNotConnected,

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error came from a rejected credential.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }

    /// Human-readable message for store outcome values.
    ///
    /// Server-provided text is passed through; everything else collapses to
    /// a generic fallback so internals never leak to end users.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            Error::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            _ => "An unknown error occurred.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_surface_server_text() {
        let err = Error::Api {
            status: 422,
            message: "email already taken".into(),
        };
        assert_eq!(err.user_message(), "email already taken");
    }

    #[test]
    fn transport_errors_collapse_to_generic_text() {
        let err = Error::RealtimeNotConnected;
        assert_eq!(err.user_message(), "An unknown error occurred.");
    }
}
