//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, TargetInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub(crate) type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Bounds applied by the client and every page session it attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdpTimeouts {
    /// One command round trip.
    pub command: Duration,
    /// Document load after `Page.navigate`.
    pub page_load: Duration,
    /// Pause between `document.readyState` checks.
    pub poll_interval: Duration,
}

impl Default for CdpTimeouts {
    fn default() -> Self {
        Self {
            command: Duration::from_secs(30),
            page_load: Duration::from_secs(30),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Pending request waiting for response.
pub(crate) struct PendingRequest {
    pub tx: oneshot::Sender<Result<Value, CdpError>>,
}

pub(crate) type PendingMap = Arc<Mutex<HashMap<u64, PendingRequest>>>;

/// Shared write half of the browser connection.
///
/// The client and all page sessions multiplex over one WebSocket; page
/// commands carry their `sessionId`.
#[derive(Clone)]
pub(crate) struct Transport {
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    request_id: Arc<AtomicU64>,
    pending: PendingMap,
    timeouts: CdpTimeouts,
}

impl Transport {
    pub(crate) fn timeouts(&self) -> &CdpTimeouts {
        &self.timeouts
    }

    /// Send a CDP command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.timeouts.command, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }
}

/// CDP client for browser automation.
///
/// Holds the browser-level WebSocket connection. Pages are driven through
/// [`PageSession`]s attached over the same connection.
pub struct CdpClient {
    /// Browser version reported by `/json/version`.
    version: BrowserVersion,
    transport: Transport,
    /// Background task handle.
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given DevTools HTTP endpoint
    /// (e.g. `http://127.0.0.1:41873`) with default timeouts.
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        Self::connect_with(endpoint, CdpTimeouts::default()).await
    }

    pub async fn connect_with(endpoint: &str, timeouts: CdpTimeouts) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/');
        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let unreachable = |e: reqwest::Error| CdpError::EndpointUnreachable {
            endpoint: http_endpoint.to_string(),
            reason: e.to_string(),
        };
        let http = reqwest::Client::builder()
            .timeout(timeouts.command)
            .build()
            .map_err(unreachable)?;
        let version: BrowserVersion = http
            .get(&version_url)
            .send()
            .await
            .map_err(unreachable)?
            .json()
            .await
            .map_err(unreachable)?;

        debug!("Connected to browser: {}", version.browser);

        let (ws_stream, _) = tokio_tungstenite::connect_async(&version.web_socket_debugger_url)
            .await
            .map_err(|e| CdpError::WebSocket(format!("connect: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending).await;
            })
        };

        debug!("CDP client connected to {}", version.web_socket_debugger_url);

        Ok(Self {
            version,
            transport: Transport {
                ws_tx: Arc::new(tokio::sync::Mutex::new(ws_sink)),
                request_id: Arc::new(AtomicU64::new(1)),
                pending,
                timeouts,
            },
            recv_task,
        })
    }

    /// WebSocket receive loop.
    async fn receive_loop(mut ws_source: WsSource, pending: PendingMap) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => Self::dispatch(resp, &pending),
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        // Wake every waiter; their senders are dropped here.
        pending.lock().clear();
    }

    /// Route a response to its waiter. Events are not consumed.
    fn dispatch(resp: CdpResponse, pending: &PendingMap) {
        let Some(id) = resp.id else {
            if let Some(method) = resp.method {
                trace!("CDP event ignored: {}", method);
            }
            return;
        };

        let Some(req) = pending.lock().remove(&id) else {
            return;
        };

        let result = match resp.error {
            Some(error) => Err(CdpError::Protocol {
                code: error.code,
                message: error.message,
            }),
            None => Ok(resp.result.unwrap_or(Value::Null)),
        };
        let _ = req.tx.send(result);
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport.call(method, params, None).await
    }

    /// Browser version reported at connect time.
    pub fn browser_version(&self) -> &BrowserVersion {
        &self.version
    }

    // ========================================================================
    // Target Management
    // ========================================================================

    /// Get all targets.
    pub async fn get_targets(&self) -> Result<Vec<TargetInfo>, CdpError> {
        let result = self.call("Target.getTargets", None).await?;
        let targets: Vec<TargetInfo> = serde_json::from_value(result["targetInfos"].clone())?;
        Ok(targets)
    }

    /// Top-level pages (tabs and popup windows) in the order Chrome reports them.
    pub async fn page_targets(&self) -> Result<Vec<TargetInfo>, CdpError> {
        Ok(self
            .get_targets()
            .await?
            .into_iter()
            .filter(TargetInfo::is_page)
            .collect())
    }

    /// Attach to an existing page or out-of-process iframe.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let session = PageSession::new(target_id.to_string(), session_id, self.transport.clone());
        session.enable_domains().await?;

        debug!("Attached to target {}", target_id);
        Ok(session)
    }

    /// Ask the browser to close all windows and exit.
    pub async fn close_browser(&self) -> Result<(), CdpError> {
        self.call("Browser.close", None).await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
