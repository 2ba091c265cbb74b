//! Throttled, retrying completion client.
//!
//! One client instance lives inside each chat session; its last-request
//! marker is the session-global throttle state. Waits are `tokio::time`
//! sleeps so tests can assert the timing contracts under paused time.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, error, warn};

use cbam_core::completion::CompletionService;
use cbam_core::error::CompletionError;

/// Minimum interval between completion requests.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(2000);

/// Base backoff between retry attempts (scales linearly with the attempt).
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Default number of attempts per call.
pub const DEFAULT_RETRIES: u32 = 2;

/// Wraps a `CompletionService` with the session-global rate limit and
/// bounded retry policy.
pub struct CompletionClient {
    service: Arc<dyn CompletionService>,
    retries: u32,
    min_request_interval: Duration,
    retry_delay: Duration,
    /// Set only on success, so a run of failures does not reset the
    /// throttle window prematurely.
    last_request_at: Option<Instant>,
}

impl CompletionClient {
    pub fn new(service: Arc<dyn CompletionService>, retries: u32) -> Self {
        Self {
            service,
            retries: retries.max(1),
            min_request_interval: MIN_REQUEST_INTERVAL,
            retry_delay: RETRY_DELAY,
            last_request_at: None,
        }
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Issue a completion request under the throttle and retry policy.
    ///
    /// Suspends until the minimum interval since the last successful request
    /// has elapsed, then attempts up to `retries` times with linear backoff
    /// (`retry_delay × attempt`) between failures. The error returned after
    /// the final attempt is terminal for the current turn, not a crash.
    pub async fn complete(
        &mut self,
        model: &str,
        prompt: &str,
    ) -> Result<String, CompletionError> {
        if let Some(last) = self.last_request_at {
            let elapsed = last.elapsed();
            if elapsed < self.min_request_interval {
                let wait = self.min_request_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Throttling completion request");
                sleep(wait).await;
            }
        }

        for attempt in 1..=self.retries {
            match self.service.complete(model, prompt).await {
                Ok(text) => {
                    self.last_request_at = Some(Instant::now());
                    debug!(attempt, answer_chars = text.len(), "Completion succeeded");
                    return Ok(text);
                }
                Err(e) if attempt < self.retries => {
                    let backoff = self.retry_delay * attempt;
                    warn!(
                        attempt,
                        error = %e,
                        backoff_secs = backoff.as_secs(),
                        "Completion attempt failed, backing off"
                    );
                    sleep(backoff).await;
                }
                Err(e) => {
                    error!(attempts = self.retries, error = %e, "Completion failed, giving up");
                    return Err(e);
                }
            }
        }

        // retries >= 1, so the loop always returns.
        unreachable!("completion retry loop exited without a result")
    }
}
