//! Driver value types: window handles, focus tokens, table snapshots, errors.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::cdp::CdpError;

/// Opaque id of a top-level browsing context (a CDP target id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(String);

impl WindowHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of a child frame among those of a window's top-level document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRef(usize);

impl FrameRef {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// The browsing context an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Focus {
    window: WindowHandle,
    frame: Option<FrameRef>,
}

impl Focus {
    /// Top-level document of `window`.
    pub fn top(window: WindowHandle) -> Self {
        Self { window, frame: None }
    }

    /// Same window, inside `frame`.
    pub fn in_frame(&self, frame: FrameRef) -> Self {
        Self {
            window: self.window.clone(),
            frame: Some(frame),
        }
    }

    /// Same window, back at the top-level document.
    pub fn to_top(&self) -> Self {
        Self::top(self.window.clone())
    }

    pub fn window(&self) -> &WindowHandle {
        &self.window
    }

    pub fn frame(&self) -> Option<FrameRef> {
        self.frame
    }

    pub fn is_top(&self) -> bool {
        self.frame.is_none()
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frame {
            Some(frame) => write!(f, "{}#frame{}", self.window, frame.index()),
            None => write!(f, "{}", self.window),
        }
    }
}

/// `<th>` or `<td>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CellKind {
    #[serde(rename = "th")]
    Header,
    #[serde(rename = "td")]
    Data,
}

/// A table cell's kind and rendered text, as the page shows it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CellSnapshot {
    pub kind: CellKind,
    pub text: String,
}

impl CellSnapshot {
    pub fn header(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Header,
            text: text.into(),
        }
    }

    pub fn data(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Data,
            text: text.into(),
        }
    }

    pub fn is_data(&self) -> bool {
        self.kind == CellKind::Data
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RowSnapshot {
    pub cells: Vec<CellSnapshot>,
}

impl RowSnapshot {
    pub fn new(cells: Vec<CellSnapshot>) -> Self {
        Self { cells }
    }

    /// `<td>` cells only.
    pub fn data_cells(&self) -> impl Iterator<Item = &CellSnapshot> {
        self.cells.iter().filter(|c| c.is_data())
    }
}

/// Captured once from the live page; later reads do not touch the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TableSnapshot {
    pub rows: Vec<RowSnapshot>,
}

impl TableSnapshot {
    pub fn new(rows: Vec<RowSnapshot>) -> Self {
        Self { rows }
    }
}

/// Driver errors.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Cdp(#[from] CdpError),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Frame {0} is missing or could not be entered")]
    FrameUnavailable(usize),

    #[error("Window not found: {0}")]
    WindowNotFound(String),

    #[error("Element not clickable: {0}")]
    NotClickable(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout(_) | DriverError::Cdp(CdpError::Timeout(_)))
    }
}
