//! ChromeLauncher core: executable discovery, process spawn, port discovery.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use super::{LaunchError, LaunchOptions};

/// File Chrome writes into the profile dir when started with
/// `--remote-debugging-port=0`. First line is the chosen port.
const DEVTOOLS_PORT_FILE: &str = "DevToolsActivePort";

/// Grace period for Chrome to exit on its own before it is killed.
const EXIT_GRACE: Duration = Duration::from_secs(2);

/// Flags for unattended operation: no first-run UI, no dialogs, no popup
/// blocking, no sandbox (containers), shared memory in /tmp.
const UNATTENDED_FLAGS: &[&str] = &[
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-background-networking",
    "--disable-sync",
    "--disable-translate",
    "--metrics-recording-only",
    "--disable-popup-blocking",
    "--mute-audio",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--start-maximized",
];

/// Launches Chrome processes.
pub struct ChromeLauncher {
    options: LaunchOptions,
}

impl ChromeLauncher {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options }
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    fn chrome_path(&self) -> Result<PathBuf, LaunchError> {
        match &self.options.chrome_path {
            Some(path) if path.exists() => Ok(path.clone()),
            Some(path) => {
                warn!("Configured Chrome path does not exist: {}", path.display());
                Err(LaunchError::ChromeNotFound)
            }
            None => Self::find_chrome().ok_or(LaunchError::ChromeNotFound),
        }
    }

    /// Command-line arguments for a launch using the given profile directory.
    pub fn build_args(&self, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "--remote-debugging-port=0".to_string(),
            format!("--user-data-dir={}", profile_dir.display()),
        ];
        args.extend(UNATTENDED_FLAGS.iter().map(|f| f.to_string()));

        if self.options.headless {
            args.push("--headless=new".to_string());
            // --start-maximized has no effect without a window manager.
            args.push("--window-size=1920,1080".to_string());
        }

        args.extend(self.options.extra_args.iter().cloned());
        args.push("about:blank".to_string());
        args
    }

    /// Parse the port from the contents of `DevToolsActivePort`.
    pub fn parse_devtools_port(content: &str) -> Option<u16> {
        content.lines().next()?.trim().parse().ok().filter(|p| *p != 0)
    }

    /// Launch Chrome and wait until its DevTools endpoint is known.
    pub async fn launch(&self) -> Result<ChromeProcess, LaunchError> {
        let chrome_path = self.chrome_path()?;
        let profile = tempfile::Builder::new().prefix("adres-chrome-").tempdir()?;

        let mut cmd = Command::new(&chrome_path);
        cmd.args(self.build_args(profile.path()))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| LaunchError::LaunchFailed(e.to_string()))?;

        info!(
            "Chrome launched with PID {:?} (profile {})",
            child.id(),
            profile.path().display()
        );

        // On error `child` is dropped here and killed.
        let port = self.wait_for_port(&mut child, profile.path()).await?;
        let endpoint = format!("http://127.0.0.1:{}", port);
        debug!("Chrome DevTools endpoint: {}", endpoint);

        Ok(ChromeProcess {
            child,
            profile,
            endpoint,
        })
    }

    async fn wait_for_port(&self, child: &mut Child, profile_dir: &Path) -> Result<u16, LaunchError> {
        let port_file = profile_dir.join(DEVTOOLS_PORT_FILE);
        let start = tokio::time::Instant::now();

        loop {
            if let Some(status) = child.try_wait()? {
                return Err(LaunchError::Exited(status.to_string()));
            }

            if let Ok(content) = tokio::fs::read_to_string(&port_file).await {
                if let Some(port) = Self::parse_devtools_port(&content) {
                    return Ok(port);
                }
            }

            if start.elapsed() > self.options.launch_timeout {
                return Err(LaunchError::PortTimeout(self.options.launch_timeout));
            }

            tokio::time::sleep(self.options.poll_interval).await;
        }
    }
}

/// A running Chrome owned by one session.
///
/// Dropping it kills the process and removes the profile directory;
/// [`ChromeProcess::shutdown`] does the same but waits for the exit.
pub struct ChromeProcess {
    child: Child,
    profile: TempDir,
    endpoint: String,
}

impl ChromeProcess {
    /// DevTools HTTP endpoint, e.g. `http://127.0.0.1:41873`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Stop the process and remove its profile.
    pub async fn shutdown(mut self) -> Result<(), LaunchError> {
        let exited = matches!(
            tokio::time::timeout(EXIT_GRACE, self.child.wait()).await,
            Ok(Ok(_))
        );

        if !exited {
            info!("Killing Chrome (PID {:?})", self.child.id());
            self.child.kill().await?;
        }

        self.profile.close()?;
        debug!("Chrome process shut down");
        Ok(())
    }
}
