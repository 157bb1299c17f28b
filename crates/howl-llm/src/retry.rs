use std::future::Future;
use std::time::Duration;

use tracing::warn;

use howl_core::errors::LlmError;

/// Explicit retry policy for chat-completion calls, applied at the call
/// site. Only `LlmError::RateLimited` is re-issued; every other error is
/// surfaced to the caller on the attempt that produced it.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// The schedule used for role resolution: up to 5 attempts, 20 s
    /// initial backoff doubling to a 300 s cap.
    pub fn role_resolution() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(20),
            max_delay: Duration::from_secs(300),
        }
    }

    /// Backoff before the retry following `attempt` (0-based). A server
    /// `retry-after` hint overrides the computed delay, still capped.
    fn retry_delay(&self, attempt: u32, suggested: Option<Duration>) -> Duration {
        if let Some(delay) = suggested {
            return delay.min(self.max_delay);
        }

        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        exp.min(self.max_delay)
    }

    /// Run `call` under this policy. The sleep between attempts is a
    /// `tokio::time::sleep`, so a backing worker pool is never blocked.
    pub async fn run<T, F, Fut>(&self, mut call: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut last_error = None;

        for attempt in 0..self.max_attempts {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !e.is_rate_limited() || attempt + 1 == self.max_attempts {
                        return Err(e);
                    }

                    let delay = self.retry_delay(attempt, e.suggested_delay());
                    warn!(
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay_secs = delay.as_secs(),
                        error = %e,
                        "rate limited, retrying"
                    );
                    last_error = Some(e);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(last_error.unwrap_or(LlmError::InvalidRequest(
            "retry policy allows zero attempts".into(),
        )))
    }
}
