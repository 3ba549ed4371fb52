//! Input (mouse and keyboard) operations for CDP page session.

use serde_json::json;
use tracing::{debug, trace};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{KeyEventType, MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    /// Click at viewport coordinates.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.mouse_move(x, y).await?;

        for event_type in [MouseEventType::MousePressed, MouseEventType::MouseReleased] {
            self.call(
                "Input.dispatchMouseEvent",
                Some(json!({
                    "type": event_type,
                    "x": x,
                    "y": y,
                    "button": MouseButton::Left,
                    "clickCount": 1,
                })),
            )
            .await?;
        }

        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }

    /// Move mouse to coordinates.
    pub async fn mouse_move(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": MouseEventType::MouseMoved,
                "x": x,
                "y": y,
                "button": MouseButton::None,
            })),
        )
        .await?;
        Ok(())
    }

    /// Type one character into the focused element as a key-down/key-up pair.
    ///
    /// Unlike `Input.insertText`, this fires `keydown`, `keypress`, `input`
    /// and `keyup`, which input masks on the page listen for.
    pub async fn type_char(&self, ch: char) -> Result<(), CdpError> {
        let text = ch.to_string();
        let mut down = json!({
            "type": KeyEventType::KeyDown,
            "key": text,
            "text": text,
            "unmodifiedText": text,
        });
        let mut up = json!({
            "type": KeyEventType::KeyUp,
            "key": text,
        });

        if let Some(code) = Self::virtual_key_code(ch) {
            down["windowsVirtualKeyCode"] = json!(code);
            up["windowsVirtualKeyCode"] = json!(code);
        }
        if let Some(code) = Self::key_code_name(ch) {
            down["code"] = json!(code);
            up["code"] = json!(code);
        }

        self.call("Input.dispatchKeyEvent", Some(down)).await?;
        self.call("Input.dispatchKeyEvent", Some(up)).await?;

        trace!("Typed one character");
        Ok(())
    }

    /// Windows virtual key code for ASCII digits and letters.
    pub(super) fn virtual_key_code(ch: char) -> Option<u32> {
        if ch.is_ascii_digit() || ch.is_ascii_uppercase() {
            Some(ch as u32)
        } else if ch.is_ascii_lowercase() {
            Some(ch.to_ascii_uppercase() as u32)
        } else {
            None
        }
    }

    /// DOM `KeyboardEvent.code` for ASCII digits and letters.
    pub(super) fn key_code_name(ch: char) -> Option<String> {
        if ch.is_ascii_digit() {
            Some(format!("Digit{}", ch))
        } else if ch.is_ascii_alphabetic() {
            Some(format!("Key{}", ch.to_ascii_uppercase()))
        } else {
            None
        }
    }
}
