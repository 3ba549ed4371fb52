//! Iframes of the top-level document and per-frame execution contexts.
//!
//! Iframes are found and entered through the DOM and Page domains rather
//! than through `contentDocument`, so cross-origin frames are as reachable
//! as same-origin ones, including frames Chrome renders in another process.

use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::NodeInfo;

use super::core::PageSession;

/// Name of the isolated worlds created for driver scripts.
const WORLD_NAME: &str = "adres";

/// Top-left corner of an iframe's content box in its parent's viewport.
const FRAME_ORIGIN_FN: &str = r#"function() {
  const rect = this.getBoundingClientRect();
  const style = getComputedStyle(this);
  return {
    x: rect.left + this.clientLeft + (parseFloat(style.paddingLeft) || 0),
    y: rect.top + this.clientTop + (parseFloat(style.paddingTop) || 0),
  };
}"#;

/// An `<iframe>` element and the frame it hosts.
#[derive(Debug, Clone)]
pub struct FrameOwner {
    pub backend_node_id: i64,
    /// `None` until the iframe has a browsing context.
    pub frame_id: Option<String>,
}

impl From<NodeInfo> for FrameOwner {
    fn from(node: NodeInfo) -> Self {
        Self {
            backend_node_id: node.backend_node_id,
            frame_id: node.frame_id,
        }
    }
}

impl PageSession {
    /// `<iframe>` elements of the top-level document, in document order.
    pub async fn iframe_owners(&self) -> Result<Vec<FrameOwner>, CdpError> {
        let document = self
            .call("DOM.getDocument", Some(json!({ "depth": 0 })))
            .await?;
        let root = document["root"]["nodeId"]
            .as_i64()
            .ok_or_else(|| CdpError::InvalidResponse("Missing root nodeId".to_string()))?;

        let found = self
            .call(
                "DOM.querySelectorAll",
                Some(json!({ "nodeId": root, "selector": "iframe" })),
            )
            .await?;
        let node_ids: Vec<i64> = serde_json::from_value(found["nodeIds"].clone())?;

        let mut owners = Vec::with_capacity(node_ids.len());
        for node_id in node_ids {
            let described = self
                .call("DOM.describeNode", Some(json!({ "nodeId": node_id })))
                .await?;
            let node: NodeInfo = serde_json::from_value(described["node"].clone())?;
            owners.push(FrameOwner::from(node));
        }

        trace!("{} iframes in {}", owners.len(), self.target_id);
        Ok(owners)
    }

    /// Create an execution context in `frame_id` that shares the frame's DOM
    /// but not its scripts. Works for any frame this page renders itself,
    /// whatever its origin.
    pub async fn create_isolated_world(&self, frame_id: &str) -> Result<i64, CdpError> {
        let result = self
            .call(
                "Page.createIsolatedWorld",
                Some(json!({
                    "frameId": frame_id,
                    "worldName": WORLD_NAME,
                })),
            )
            .await?;

        let context_id = result["executionContextId"].as_i64().ok_or_else(|| {
            CdpError::InvalidResponse("Missing executionContextId".to_string())
        })?;
        debug!("Isolated world {} in frame {}", context_id, frame_id);
        Ok(context_id)
    }

    /// Viewport offset of an iframe's content box.
    pub async fn frame_origin(&self, owner: &FrameOwner) -> Result<(f64, f64), CdpError> {
        let node = self
            .call(
                "DOM.resolveNode",
                Some(json!({ "backendNodeId": owner.backend_node_id })),
            )
            .await?;
        let object_id = node["object"]["objectId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing objectId".to_string()))?
            .to_string();

        let result = self
            .call(
                "Runtime.callFunctionOn",
                Some(json!({
                    "objectId": object_id,
                    "functionDeclaration": FRAME_ORIGIN_FN,
                    "returnByValue": true,
                })),
            )
            .await;

        if let Err(e) = self
            .call("Runtime.releaseObject", Some(json!({ "objectId": object_id })))
            .await
        {
            trace!("Could not release frame owner handle: {}", e);
        }

        let result = result?;
        if let Some(exception) = result.get("exceptionDetails") {
            return Err(CdpError::JavaScript(Self::exception_text(exception)));
        }
        Self::parse_point(&result["result"]["value"])
    }

    pub(super) fn parse_point(value: &Value) -> Result<(f64, f64), CdpError> {
        match (value["x"].as_f64(), value["y"].as_f64()) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(CdpError::InvalidResponse(format!("expected a point, got {}", value))),
        }
    }
}
