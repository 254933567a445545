//! Fetch-with-retry: exponential backoff on rate limiting.
//!
//! Only rate limiting is recovered locally. Every other failure is surfaced
//! on first occurrence so the session can decide what to do with it.

use std::time::Duration;

use crate::error::{FetchError, ProviderError};
use crate::model::{BatchRequest, QuestionBatch, RESPONSE_CODE_RATE_LIMIT};
use crate::traits::QuestionProvider;

/// How often and how patiently to retry a rate-limited request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Sleep before the first retry; doubled before each following one.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay: initial_delay.max(Duration::from_millis(1)),
        }
    }

    /// Upper bound on the total time spent sleeping between attempts.
    pub fn max_backoff(&self) -> Duration {
        let factor = self
            .max_retries
            .checked_add(1)
            .and_then(|exp| 2u32.checked_pow(exp))
            .map(|f| f - 1)
            .unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Request one question batch, backing off while the provider rate limits.
///
/// Sleeps `initial_delay`, then twice that, and so on, for at most
/// `max_retries` retries. Never returns an empty batch.
pub async fn fetch_question_batch(
    provider: &dyn QuestionProvider,
    request: &BatchRequest,
    policy: &RetryPolicy,
) -> Result<QuestionBatch, FetchError> {
    let mut retries_left = policy.max_retries;
    let mut delay = policy.initial_delay;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        tracing::debug!(provider = provider.name(), attempt = attempts, "requesting question batch");

        let outcome = provider
            .request_batch(request)
            .await
            .and_then(check_batch);

        match outcome {
            Ok(batch) => return Ok(batch),
            Err(e) if e.is_rate_limit() && retries_left > 0 => {
                tracing::warn!(
                    provider = provider.name(),
                    attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                retries_left -= 1;
                delay = delay.saturating_mul(2);
            }
            Err(e) if e.is_rate_limit() => {
                tracing::warn!(provider = provider.name(), attempts, "rate limit retries exhausted");
                return Err(FetchError::RateLimited { attempts });
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), attempt = attempts, "fetch failed: {e}");
                return Err(FetchError::FetchFailed(e.to_string()));
            }
        }
    }
}

/// Reject batches that carry an error code in the body or no questions.
fn check_batch(batch: QuestionBatch) -> Result<QuestionBatch, ProviderError> {
    match batch.response_code {
        0 => {}
        RESPONSE_CODE_RATE_LIMIT => return Err(ProviderError::RateLimited),
        code => {
            return Err(ProviderError::InvalidResponse(format!(
                "provider response code {code}"
            )))
        }
    }
    if batch.results.is_empty() {
        return Err(ProviderError::InvalidResponse("empty question batch".into()));
    }
    Ok(batch)
}
