//! Core session struct and CDP command dispatch.

use serde_json::Value;
use tracing::debug;

use crate::cdp::client::Transport;
use crate::cdp::error::CdpError;

/// A session attached to a single page/target.
pub struct PageSession {
    /// Target ID (doubles as the window handle).
    pub(super) target_id: String,
    /// Session ID for this target.
    pub(super) session_id: String,
    /// Connection shared with the client.
    pub(super) transport: Transport,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, transport: Transport) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }
}
