//! DevTools transport errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    /// `/json/version` could not be fetched or parsed.
    #[error("DevTools endpoint {endpoint} unreachable: {reason}")]
    EndpointUnreachable { endpoint: String, reason: String },

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Chrome answered a command with an error object.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Malformed CDP message: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// A page script threw.
    #[error("Script error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// The connection went away, or Chrome is shutting down.
    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_unreachable_display() {
        let err = CdpError::EndpointUnreachable {
            endpoint: "http://127.0.0.1:9222".into(),
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "DevTools endpoint http://127.0.0.1:9222 unreachable: connection refused"
        );
    }

    #[test]
    fn test_malformed_message_converts() {
        let err: CdpError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, CdpError::Serialization(_)));
    }
}
