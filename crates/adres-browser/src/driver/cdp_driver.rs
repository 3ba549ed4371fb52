//! [`BrowserDriver`] over the Chrome DevTools Protocol.
//!
//! A frame focus is resolved to a frame id over CDP, never through the
//! embedding page's scripts, so cross-origin iframes work like same-origin
//! ones. Frames the window renders itself get an isolated world; frames
//! Chrome moved to another process are attached as targets of their own.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::driver_types::{DriverError, Focus, FrameRef, TableSnapshot, WindowHandle};
use super::scripts;
use super::BrowserDriver;
use crate::cdp::{
    BrowserVersion, CdpClient, CdpError, CdpTimeouts, FrameOwner, PageSession, TargetInfo,
};

/// Click target computed in the page.
#[derive(Debug, Deserialize)]
struct ClickPoint {
    x: f64,
    y: f64,
    visible: bool,
}

/// Where scripts for one iframe run.
#[derive(Clone)]
enum FrameContext {
    /// Isolated world inside a frame the window's own renderer draws.
    Local { context_id: i64 },
    /// Out-of-process iframe; its main world is reached through its own session.
    Remote(Arc<PageSession>),
}

/// Drives one Chrome instance. Page sessions are attached lazily, one per
/// window, the first time a focus on that window is used.
pub struct CdpDriver {
    client: CdpClient,
    primary: WindowHandle,
    sessions: Mutex<HashMap<WindowHandle, Arc<PageSession>>>,
    /// Keyed by frame id.
    frame_contexts: Mutex<HashMap<String, FrameContext>>,
}

impl CdpDriver {
    /// Connect to Chrome's DevTools endpoint with default timeouts.
    pub async fn connect(endpoint: &str) -> Result<Self, DriverError> {
        Self::connect_with(endpoint, CdpTimeouts::default()).await
    }

    /// Connect to Chrome's DevTools endpoint and adopt its first page as the
    /// primary window.
    pub async fn connect_with(endpoint: &str, timeouts: CdpTimeouts) -> Result<Self, DriverError> {
        let client = CdpClient::connect_with(endpoint, timeouts).await?;

        let primary = client
            .page_targets()
            .await?
            .into_iter()
            .next()
            .map(|t| WindowHandle::new(t.target_id))
            .ok_or_else(|| DriverError::WindowNotFound("no initial page".to_string()))?;

        info!("Driving {} (primary window {})", client.browser_version().browser, primary);

        Ok(Self {
            client,
            primary,
            sessions: Mutex::new(HashMap::new()),
            frame_contexts: Mutex::new(HashMap::new()),
        })
    }

    pub fn browser_version(&self) -> &BrowserVersion {
        self.client.browser_version()
    }

    async fn session(&self, window: &WindowHandle) -> Result<Arc<PageSession>, DriverError> {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(window) {
            return Ok(session.clone());
        }

        let session = match self.client.attach_page(window.as_str()).await {
            Ok(session) => Arc::new(session),
            Err(CdpError::Protocol { message, .. }) => {
                return Err(DriverError::WindowNotFound(format!("{}: {}", window, message)));
            }
            Err(e) => return Err(e.into()),
        };

        debug!("Attached session {} for window {}", session.session_id(), window);
        sessions.insert(window.clone(), session.clone());
        Ok(session)
    }

    /// The `frame`-th iframe of the window's top-level document.
    async fn frame_owner(
        &self,
        session: &PageSession,
        frame: FrameRef,
    ) -> Result<FrameOwner, DriverError> {
        session
            .iframe_owners()
            .await?
            .into_iter()
            .nth(frame.index())
            .ok_or(DriverError::FrameUnavailable(frame.index()))
    }

    async fn frame_context(
        &self,
        session: &PageSession,
        frame_id: &str,
        frame: FrameRef,
    ) -> Result<FrameContext, DriverError> {
        let mut contexts = self.frame_contexts.lock().await;
        if let Some(context) = contexts.get(frame_id) {
            return Ok(context.clone());
        }

        let targets = self.client.get_targets().await?;

        let context = if is_out_of_process(&targets, frame_id) {
            let remote = self.client.attach_page(frame_id).await.map_err(|e| {
                debug!("Could not attach to frame {}: {}", frame_id, e);
                DriverError::FrameUnavailable(frame.index())
            })?;
            debug!("Frame {} runs out of process", frame_id);
            FrameContext::Remote(Arc::new(remote))
        } else {
            let context_id = session.create_isolated_world(frame_id).await.map_err(|e| {
                debug!("Could not enter frame {}: {}", frame_id, e);
                DriverError::FrameUnavailable(frame.index())
            })?;
            FrameContext::Local { context_id }
        };

        contexts.insert(frame_id.to_string(), context.clone());
        Ok(context)
    }

    async fn eval_in_frame(
        &self,
        session: &PageSession,
        frame: FrameRef,
        script: &str,
    ) -> Result<Value, DriverError> {
        let frame_id = self
            .frame_owner(session, frame)
            .await?
            .frame_id
            .ok_or(DriverError::FrameUnavailable(frame.index()))?;

        // A context dies with the document it was created in; recreate it once.
        for attempt in 0..2 {
            let context = self.frame_context(session, &frame_id, frame).await?;
            let result = match &context {
                FrameContext::Local { context_id } => {
                    session.evaluate_in(script, Some(*context_id)).await
                }
                FrameContext::Remote(remote) => remote.evaluate(script).await,
            };

            match result {
                Err(CdpError::Protocol { message, .. }) => {
                    debug!("Frame {} context is stale ({}), attempt {}", frame_id, message, attempt);
                    self.frame_contexts.lock().await.remove(&frame_id);
                }
                other => return Ok(other?),
            }
        }

        Err(DriverError::FrameUnavailable(frame.index()))
    }

    /// Evaluate `body` against the focused document.
    async fn eval(&self, focus: &Focus, body: &str) -> Result<Value, DriverError> {
        let session = self.session(focus.window()).await?;
        let script = scripts::in_document(body);

        match focus.frame() {
            None => Ok(session.evaluate(&script).await?),
            Some(frame) => self.eval_in_frame(&session, frame, &script).await,
        }
    }

    async fn eval_bool(&self, focus: &Focus, body: &str) -> Result<bool, DriverError> {
        let value = self.eval(focus, body).await?;
        value
            .as_bool()
            .ok_or_else(|| DriverError::InvalidResponse(format!("expected boolean, got {}", value)))
    }
}

/// Chrome runs a frame as a target of its own once it moves it to another
/// renderer; the target id is then the frame id.
fn is_out_of_process(targets: &[TargetInfo], frame_id: &str) -> bool {
    targets
        .iter()
        .any(|t| t.is_iframe() && t.target_id == frame_id)
}

#[async_trait]
impl BrowserDriver for CdpDriver {
    fn primary_window(&self) -> WindowHandle {
        self.primary.clone()
    }

    async fn navigate(&self, focus: &Focus, url: &str) -> Result<(), DriverError> {
        let session = self.session(focus.window()).await?;
        session.navigate(url).await?;
        Ok(())
    }

    async fn window_handles(&self) -> Result<Vec<WindowHandle>, DriverError> {
        Ok(self
            .client
            .page_targets()
            .await?
            .into_iter()
            .map(|t| WindowHandle::new(t.target_id))
            .collect())
    }

    async fn frames(&self, focus: &Focus) -> Result<Vec<FrameRef>, DriverError> {
        let session = self.session(focus.window()).await?;
        let owners = session.iframe_owners().await?;
        Ok((0..owners.len()).map(FrameRef::new).collect())
    }

    async fn element_exists(&self, focus: &Focus, id: &str) -> Result<bool, DriverError> {
        self.eval_bool(focus, &scripts::element_exists(id)).await
    }

    async fn element_interactable(&self, focus: &Focus, id: &str) -> Result<bool, DriverError> {
        self.eval_bool(focus, &scripts::element_interactable(id)).await
    }

    async fn select_option(&self, focus: &Focus, id: &str, value: &str) -> Result<(), DriverError> {
        let result = self.eval(focus, &scripts::select_option(id, value)).await?;
        match result.as_str() {
            Some("ok") => Ok(()),
            Some("no-option") => Err(DriverError::ElementNotFound(format!(
                "option '{}' in #{}",
                value, id
            ))),
            Some("missing") => Err(DriverError::ElementNotFound(format!("#{}", id))),
            _ => Err(DriverError::InvalidResponse(result.to_string())),
        }
    }

    async fn click(&self, focus: &Focus, id: &str) -> Result<(), DriverError> {
        let value = self.eval(focus, &scripts::click_point(id)).await?;
        if value.is_null() {
            return Err(DriverError::ElementNotFound(format!("#{}", id)));
        }

        let point: ClickPoint = serde_json::from_value(value)
            .map_err(|e| DriverError::InvalidResponse(e.to_string()))?;
        if !point.visible {
            return Err(DriverError::NotClickable(format!("#{}", id)));
        }

        let session = self.session(focus.window()).await?;
        let (dx, dy) = match focus.frame() {
            Some(frame) => {
                let owner = self.frame_owner(&session, frame).await?;
                session.frame_origin(&owner).await?
            }
            None => (0.0, 0.0),
        };

        session.click(point.x + dx, point.y + dy).await?;
        Ok(())
    }

    async fn clear(&self, focus: &Focus, id: &str) -> Result<(), DriverError> {
        if self.eval_bool(focus, &scripts::clear(id)).await? {
            Ok(())
        } else {
            Err(DriverError::ElementNotFound(format!("#{}", id)))
        }
    }

    async fn type_char(&self, focus: &Focus, ch: char) -> Result<(), DriverError> {
        let session = self.session(focus.window()).await?;
        session.type_char(ch).await?;
        Ok(())
    }

    async fn body_present(&self, focus: &Focus) -> Result<bool, DriverError> {
        self.eval_bool(focus, &scripts::body_present()).await
    }

    async fn text_contains(&self, focus: &Focus, phrase: &str) -> Result<bool, DriverError> {
        self.eval_bool(focus, &scripts::text_contains(phrase)).await
    }

    async fn tables(&self, focus: &Focus) -> Result<Vec<TableSnapshot>, DriverError> {
        let value = self.eval(focus, &scripts::tables()).await?;
        serde_json::from_value(value).map_err(|e| DriverError::InvalidResponse(e.to_string()))
    }

    async fn quit(&self) -> Result<(), DriverError> {
        self.frame_contexts.lock().await.clear();
        self.sessions.lock().await.clear();
        match self.client.close_browser().await {
            // Chrome may drop the socket before answering.
            Ok(()) | Err(CdpError::SessionClosed) => {}
            Err(e) => return Err(e.into()),
        }
        info!("Browser closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str, kind: &str) -> TargetInfo {
        serde_json::from_value(serde_json::json!({
            "targetId": id,
            "type": kind,
            "url": "https://aplicaciones.adres.gov.co/bdua",
        }))
        .unwrap()
    }

    #[test]
    fn test_out_of_process_frame_has_iframe_target() {
        let targets = [target("PAGE", "page"), target("F1", "iframe")];
        assert!(is_out_of_process(&targets, "F1"));
    }

    #[test]
    fn test_in_process_frame_has_no_target() {
        let targets = [target("PAGE", "page"), target("F1", "iframe")];
        assert!(!is_out_of_process(&targets, "F2"));
    }

    #[test]
    fn test_page_target_with_same_id_is_not_a_frame() {
        assert!(!is_out_of_process(&[target("F1", "page")], "F1"));
    }
}
