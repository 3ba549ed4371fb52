//! Scripted in-memory portal for pipeline tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use adres_browser::{
    BrowserDriver, DriverError, Focus, FrameRef, TableSnapshot, WindowHandle,
};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ScrapeError;
use crate::lifecycle::{BrowserSession, SessionFactory};

pub const MAIN: &str = "main";
pub const POPUP: &str = "popup";

const INPUT_ID: &str = "txtNumDoc";
const DOC_TYPE_ID: &str = "tipoDoc";
const SUBMIT_ID: &str = "btnConsultar";

/// What the result window shows.
#[derive(Debug, Clone)]
pub enum PopupContent {
    NotFound,
    Tables(Vec<TableSnapshot>),
    /// Loads, but never shows the phrase nor any table.
    Blank,
    /// Never gets a body.
    NoBody,
}

/// How closing the browser goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitBehavior {
    Clean,
    Fails,
    Panics,
}

#[derive(Debug, Clone)]
pub struct FakePortal {
    pub frame_count: usize,
    /// Frame holding the form; `None` puts it in the top-level document.
    pub form_frame: Option<usize>,
    pub has_document_type: bool,
    pub input_interactable: bool,
    pub has_submit: bool,
    /// `None`: submitting opens no window.
    pub popup: Option<PopupContent>,
    /// Table reads that come back empty before the tables render.
    pub empty_table_reads: usize,
    pub panic_on_navigate: bool,
    pub quit: QuitBehavior,
}

impl Default for FakePortal {
    fn default() -> Self {
        Self {
            frame_count: 3,
            form_frame: Some(2),
            has_document_type: true,
            input_interactable: true,
            has_submit: true,
            popup: Some(PopupContent::Blank),
            empty_table_reads: 0,
            panic_on_navigate: false,
            quit: QuitBehavior::Clean,
        }
    }
}

/// Counters shared by every driver a factory hands out.
#[derive(Debug, Default)]
pub struct FakeCalls {
    pub sessions: AtomicUsize,
    pub quits: AtomicUsize,
    pub table_reads: AtomicUsize,
    pub submits: AtomicUsize,
    pub typed: Mutex<String>,
    pub selected: Mutex<Option<String>>,
    pub navigations: Mutex<Vec<String>>,
}

impl FakeCalls {
    pub fn quits(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }

    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    pub fn table_reads(&self) -> usize {
        self.table_reads.load(Ordering::SeqCst)
    }
}

pub struct FakeDriver {
    portal: FakePortal,
    calls: Arc<FakeCalls>,
    popup_open: AtomicBool,
    input_focused: AtomicBool,
}

impl FakeDriver {
    pub fn new(portal: FakePortal, calls: Arc<FakeCalls>) -> Self {
        Self {
            portal,
            calls,
            popup_open: AtomicBool::new(false),
            input_focused: AtomicBool::new(false),
        }
    }

    fn in_popup(&self, focus: &Focus) -> bool {
        focus.window().as_str() == POPUP
    }

    fn is_form(&self, focus: &Focus) -> bool {
        focus.window().as_str() == MAIN && focus.frame().map(|f| f.index()) == self.portal.form_frame
    }

    fn check_frame(&self, focus: &Focus) -> Result<(), DriverError> {
        match focus.frame() {
            Some(frame) if frame.index() >= self.portal.frame_count => {
                Err(DriverError::FrameUnavailable(frame.index()))
            }
            _ => Ok(()),
        }
    }

    fn popup_content(&self, focus: &Focus) -> Option<&PopupContent> {
        if self.in_popup(focus) && self.popup_open.load(Ordering::SeqCst) {
            self.portal.popup.as_ref()
        } else {
            None
        }
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    fn primary_window(&self) -> WindowHandle {
        WindowHandle::new(MAIN)
    }

    async fn navigate(&self, _focus: &Focus, url: &str) -> Result<(), DriverError> {
        if self.portal.panic_on_navigate {
            panic!("renderer crashed");
        }
        self.calls.navigations.lock().push(url.to_string());
        Ok(())
    }

    async fn window_handles(&self) -> Result<Vec<WindowHandle>, DriverError> {
        let mut handles = vec![WindowHandle::new(MAIN)];
        if self.popup_open.load(Ordering::SeqCst) {
            handles.push(WindowHandle::new(POPUP));
        }
        Ok(handles)
    }

    async fn frames(&self, focus: &Focus) -> Result<Vec<FrameRef>, DriverError> {
        if self.in_popup(focus) {
            return Ok(Vec::new());
        }
        Ok((0..self.portal.frame_count).map(FrameRef::new).collect())
    }

    async fn element_exists(&self, focus: &Focus, id: &str) -> Result<bool, DriverError> {
        self.check_frame(focus)?;
        if !self.is_form(focus) {
            return Ok(false);
        }
        Ok(match id {
            INPUT_ID => true,
            DOC_TYPE_ID => self.portal.has_document_type,
            SUBMIT_ID => self.portal.has_submit,
            _ => false,
        })
    }

    async fn element_interactable(&self, focus: &Focus, id: &str) -> Result<bool, DriverError> {
        self.check_frame(focus)?;
        if !self.is_form(focus) {
            return Ok(false);
        }
        Ok(match id {
            INPUT_ID => self.portal.input_interactable,
            DOC_TYPE_ID => self.portal.has_document_type,
            SUBMIT_ID => self.portal.has_submit,
            _ => false,
        })
    }

    async fn select_option(&self, focus: &Focus, id: &str, value: &str) -> Result<(), DriverError> {
        if self.is_form(focus) && id == DOC_TYPE_ID && self.portal.has_document_type {
            *self.calls.selected.lock() = Some(value.to_string());
            Ok(())
        } else {
            Err(DriverError::ElementNotFound(id.to_string()))
        }
    }

    async fn click(&self, focus: &Focus, id: &str) -> Result<(), DriverError> {
        if !self.is_form(focus) {
            return Err(DriverError::ElementNotFound(id.to_string()));
        }
        match id {
            INPUT_ID if self.portal.input_interactable => {
                self.input_focused.store(true, Ordering::SeqCst);
                Ok(())
            }
            SUBMIT_ID if self.portal.has_submit => {
                self.calls.submits.fetch_add(1, Ordering::SeqCst);
                if self.portal.popup.is_some() {
                    self.popup_open.store(true, Ordering::SeqCst);
                }
                Ok(())
            }
            _ => Err(DriverError::NotClickable(id.to_string())),
        }
    }

    async fn clear(&self, focus: &Focus, id: &str) -> Result<(), DriverError> {
        if !self.is_form(focus) || id != INPUT_ID {
            return Err(DriverError::ElementNotFound(id.to_string()));
        }
        self.calls.typed.lock().clear();
        Ok(())
    }

    async fn type_char(&self, _focus: &Focus, ch: char) -> Result<(), DriverError> {
        if self.input_focused.load(Ordering::SeqCst) {
            self.calls.typed.lock().push(ch);
        }
        Ok(())
    }

    async fn body_present(&self, focus: &Focus) -> Result<bool, DriverError> {
        if !self.in_popup(focus) {
            return Ok(true);
        }
        Ok(!matches!(self.popup_content(focus), Some(PopupContent::NoBody) | None))
    }

    async fn text_contains(&self, focus: &Focus, _phrase: &str) -> Result<bool, DriverError> {
        Ok(matches!(self.popup_content(focus), Some(PopupContent::NotFound)))
    }

    async fn tables(&self, focus: &Focus) -> Result<Vec<TableSnapshot>, DriverError> {
        let reads = self.calls.table_reads.fetch_add(1, Ordering::SeqCst);
        match self.popup_content(focus) {
            Some(PopupContent::Tables(tables)) if reads >= self.portal.empty_table_reads => {
                Ok(tables.clone())
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn quit(&self) -> Result<(), DriverError> {
        self.calls.quits.fetch_add(1, Ordering::SeqCst);
        match self.portal.quit {
            QuitBehavior::Clean => Ok(()),
            QuitBehavior::Fails => Err(DriverError::Timeout("Browser.close".to_string())),
            QuitBehavior::Panics => panic!("browser crashed while closing"),
        }
    }
}

/// Hands out a fresh [`FakeDriver`] per session.
pub struct FakeFactory {
    pub portal: FakePortal,
    pub calls: Arc<FakeCalls>,
    pub fail_with: Option<ScrapeError>,
}

impl FakeFactory {
    pub fn new(portal: FakePortal) -> Self {
        Self {
            portal,
            calls: Arc::new(FakeCalls::default()),
            fail_with: None,
        }
    }
}

#[async_trait]
impl SessionFactory for FakeFactory {
    async fn create(&self) -> Result<BrowserSession, ScrapeError> {
        if let Some(e) = &self.fail_with {
            return Err(e.clone());
        }
        self.calls.sessions.fetch_add(1, Ordering::SeqCst);
        let driver = FakeDriver::new(self.portal.clone(), self.calls.clone());
        Ok(BrowserSession::new(Box::new(driver)))
    }
}
