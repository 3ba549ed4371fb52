//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate a JavaScript expression in the page's main world and return
    /// its value by value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        self.evaluate_in(expression, None).await
    }

    /// Evaluate in a specific execution context, e.g. an isolated world.
    pub async fn evaluate_in(
        &self,
        expression: &str,
        context_id: Option<i64>,
    ) -> Result<Value, CdpError> {
        let mut params = json!({
            "expression": expression,
            "returnByValue": true,
            "awaitPromise": true,
        });
        if let Some(id) = context_id {
            params["contextId"] = json!(id);
        }

        let result = self.call("Runtime.evaluate", Some(params)).await?;

        if let Some(exception) = result.get("exceptionDetails") {
            return Err(CdpError::JavaScript(Self::exception_text(exception)));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Prefer the thrown error's description over the generic "Uncaught".
    pub(super) fn exception_text(exception: &Value) -> String {
        exception["exception"]["description"]
            .as_str()
            .or_else(|| exception["text"].as_str())
            .unwrap_or("Unknown error")
            .to_string()
    }
}
