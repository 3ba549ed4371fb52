//! Bounded polling waits.

use std::future::Future;
use std::time::Duration;

use tracing::trace;

use super::driver_types::DriverError;

/// Polls a condition until it yields a value or the bound elapses.
///
/// Driver errors raised by the condition count as "not yet": pages under
/// load routinely detach frames or reject evaluation for a moment. The last
/// such error is reported if the wait times out.
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    timeout: Duration,
    poll: Duration,
}

impl Wait {
    pub fn new(timeout: Duration, poll: Duration) -> Self {
        Self { timeout, poll }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait until `check` returns `Ok(Some(_))`. The condition is always
    /// evaluated at least once, even with a zero timeout.
    pub async fn until<T, F, Fut>(&self, what: &str, mut check: F) -> Result<T, DriverError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, DriverError>>,
    {
        let start = tokio::time::Instant::now();
        let mut last_error: Option<DriverError> = None;

        loop {
            match check().await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) => {
                    trace!("wait for {}: {}", what, e);
                    last_error = Some(e);
                }
            }

            if start.elapsed() >= self.timeout {
                let detail = match last_error {
                    Some(e) => format!("{} (last error: {})", what, e),
                    None => what.to_string(),
                };
                return Err(DriverError::Timeout(detail));
            }

            tokio::time::sleep(self.poll).await;
        }
    }

    /// Wait until `check` returns `Ok(true)`.
    pub async fn until_true<F, Fut>(&self, what: &str, mut check: F) -> Result<(), DriverError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, DriverError>>,
    {
        self.until(what, || {
            let fut = check();
            async move { fut.await.map(|ok| ok.then_some(())) }
        })
        .await
    }
}
