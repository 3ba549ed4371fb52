//! Wire types for the DevTools protocol.
//!
//! Only the slice of the protocol the driver speaks is modeled; results are
//! otherwise handled as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing command. `session_id` routes it to an attached page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Incoming message: a command reply when `id` is set, an event otherwise.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    pub params: Option<Value>,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
}

/// One entry of `Target.getTargets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    pub target_id: String,
    #[serde(rename = "type")]
    pub target_type: String,
    pub url: String,
    /// Set on windows opened by another page, e.g. a result popup.
    pub opener_id: Option<String>,
}

impl TargetInfo {
    /// Top-level browsing contexts (tabs and popup windows).
    pub fn is_page(&self) -> bool {
        self.target_type == "page"
    }

    /// Out-of-process iframes. Their target id is the frame id.
    pub fn is_iframe(&self) -> bool {
        self.target_type == "iframe"
    }
}

/// `DOM.Node`, reduced to what frame resolution needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub backend_node_id: i64,
    #[serde(default)]
    pub node_name: String,
    /// Set on frame owner elements whose frame exists, in or out of process.
    pub frame_id: Option<String>,
}

/// `/json/version`. Chrome uses PascalCase keys here.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    /// e.g. `HeadlessChrome/142.0.7444.59`
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    None,
    Left,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseEventType {
    MousePressed,
    MouseReleased,
    MouseMoved,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyEventType {
    KeyDown,
    KeyUp,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
