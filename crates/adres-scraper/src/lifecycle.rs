//! Browser session lifecycle.
//!
//! Every query gets its own browser. [`SessionLifecycle::run`] creates the
//! session, runs one attempt in it and tears it down afterwards on every
//! path, including a panic inside the attempt. Teardown is best effort:
//! its failures are logged and never replace the attempt's outcome.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use adres_browser::{
    BrowserDriver, CdpDriver, CdpTimeouts, ChromeLauncher, ChromeProcess, ChromeVersion, Focus,
    LaunchOptions, VersionCheck,
};
use adres_config::{BrowserConfig, TimingConfig};
use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::error::ScrapeError;
use crate::record::{Outcome, QueryRequest};

/// One browser and, when this process launched it, the process itself.
pub struct BrowserSession {
    driver: Box<dyn BrowserDriver>,
    process: Option<ChromeProcess>,
}

impl BrowserSession {
    pub fn new(driver: Box<dyn BrowserDriver>) -> Self {
        Self {
            driver,
            process: None,
        }
    }

    pub fn with_process(driver: Box<dyn BrowserDriver>, process: ChromeProcess) -> Self {
        Self {
            driver,
            process: Some(process),
        }
    }

    pub fn driver(&self) -> &dyn BrowserDriver {
        self.driver.as_ref()
    }

    /// Top-level document of the window the browser opened with.
    pub fn primary_focus(&self) -> Focus {
        Focus::top(self.driver.primary_window())
    }

    /// Close the browser, then stop the process and remove its profile.
    pub async fn teardown(self) {
        if let Err(e) = self.driver.quit().await {
            warn!("Browser quit failed: {}", e);
        }

        if let Some(process) = self.process {
            if let Err(e) = process.shutdown().await {
                warn!("Browser process shutdown failed: {}", e);
            }
        }

        debug!("Browser session torn down");
    }
}

/// Creates a ready-to-use browser session.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create(&self) -> Result<BrowserSession, ScrapeError>;
}

/// Launches a private Chrome per session and connects to it over CDP.
pub struct ChromeSessionFactory {
    launcher: ChromeLauncher,
    timeouts: CdpTimeouts,
    expected_major_version: Option<u32>,
}

impl ChromeSessionFactory {
    pub fn new(
        launcher: ChromeLauncher,
        timeouts: CdpTimeouts,
        expected_major_version: Option<u32>,
    ) -> Self {
        Self {
            launcher,
            timeouts,
            expected_major_version,
        }
    }

    pub fn from_config(browser: &BrowserConfig, timing: &TimingConfig) -> Self {
        let options = LaunchOptions {
            chrome_path: browser.chrome_path.clone(),
            headless: browser.headless,
            extra_args: browser.extra_args.clone(),
            launch_timeout: browser.launch_timeout(),
            poll_interval: timing.poll_interval(),
        };
        Self::new(
            ChromeLauncher::new(options),
            Self::timeouts(timing),
            browser.expected_major_version,
        )
    }

    /// Document loads share the entry-page bound.
    fn timeouts(timing: &TimingConfig) -> CdpTimeouts {
        CdpTimeouts {
            command: timing.command_timeout(),
            page_load: timing.page_wait(),
            poll_interval: timing.poll_interval(),
        }
    }

    fn check_version(&self, driver: &CdpDriver) {
        let raw = &driver.browser_version().browser;
        let Some(version) = ChromeVersion::parse(raw) else {
            warn!("Unrecognized browser version string {:?}", raw);
            return;
        };

        match version.check(self.expected_major_version) {
            VersionCheck::Unpinned | VersionCheck::Matches => debug!("Browser version {}", version),
            VersionCheck::Mismatch { expected, actual } => warn!(
                "Browser major version {} differs from the expected {}; continuing",
                actual, expected
            ),
        }
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    async fn create(&self) -> Result<BrowserSession, ScrapeError> {
        let process = self.launcher.launch().await?;

        match CdpDriver::connect_with(process.endpoint(), self.timeouts).await {
            Ok(driver) => {
                self.check_version(&driver);
                Ok(BrowserSession::with_process(Box::new(driver), process))
            }
            Err(e) => {
                if let Err(shutdown) = process.shutdown().await {
                    warn!("Browser process shutdown failed: {}", shutdown);
                }
                Err(ScrapeError::Launch(e.to_string()))
            }
        }
    }
}

/// Work done inside one session.
#[async_trait]
pub trait SessionAttempt: Send + Sync {
    async fn attempt(&self, session: &BrowserSession, request: &QueryRequest) -> Outcome;
}

/// Session-per-attempt runner.
#[derive(Clone)]
pub struct SessionLifecycle {
    factory: Arc<dyn SessionFactory>,
}

impl SessionLifecycle {
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self { factory }
    }

    /// Create a session, run `attempt` in it, tear it down.
    ///
    /// Never panics on behalf of the attempt or its teardown, and always
    /// returns exactly one outcome.
    pub async fn run<A>(&self, attempt: &A, request: &QueryRequest) -> Outcome
    where
        A: SessionAttempt + ?Sized,
    {
        let session = match self.factory.create().await {
            Ok(session) => session,
            Err(e) => {
                error!("Could not start a browser session: {}", e);
                return Outcome::Failed(e);
            }
        };
        info!("Browser session started");

        let outcome = match AssertUnwindSafe(attempt.attempt(&session, request))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Query attempt panicked");
                Outcome::Failed(ScrapeError::Panicked)
            }
        };

        if AssertUnwindSafe(session.teardown())
            .catch_unwind()
            .await
            .is_err()
        {
            error!("Browser session teardown panicked");
        }
        outcome
    }
}
