//! Provider and fetch error types.
//!
//! `ProviderError` describes a single failed request against a question bank.
//! `FetchError` is what the retry layer hands the session controller after
//! local recovery: either the rate limit never cleared, or something else went
//! wrong and was surfaced unchanged.

use thiserror::Error;

/// Errors that can occur on a single question-bank request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider signalled rate limiting (HTTP 429 or an in-body code).
    #[error("rate limited by provider")]
    RateLimited,

    /// The API returned a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Returns `true` if this error is worth retrying with backoff.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ProviderError::RateLimited)
    }
}

/// Classified failure of a fetch after retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Every attempt was rate limited.
    #[error("rate limit reached after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Any non rate-limit failure, surfaced on the first occurrence.
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}

impl FetchError {
    /// Message shown to the player when the session cannot start.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::RateLimited { .. } => "API rate limit reached. Wait a moment and refresh.",
            FetchError::FetchFailed(_) => "Something went wrong while fetching the data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_distinguish_rate_limit() {
        let limited = FetchError::RateLimited { attempts: 4 };
        let failed = FetchError::FetchFailed("boom".into());
        assert!(limited.user_message().contains("rate limit"));
        assert_ne!(limited.user_message(), failed.user_message());
    }

    #[test]
    fn only_rate_limiting_is_retryable() {
        assert!(ProviderError::RateLimited.is_rate_limit());
        assert!(!ProviderError::Timeout(30).is_rate_limit());
        assert!(!ProviderError::ApiError {
            status: 503,
            message: "unavailable".into(),
        }
        .is_rate_limit());
    }
}
