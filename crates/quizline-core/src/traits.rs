//! Core trait definitions for question-bank providers.
//!
//! Implemented by the `quizline-providers` crate for real HTTP backends and
//! for scripted test doubles.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::model::{BatchRequest, QuestionBatch};

// ---------------------------------------------------------------------------
// Question provider trait
// ---------------------------------------------------------------------------

/// A remote bank that serves trivia questions in batches.
///
/// One call is one request: implementations must not retry on their own.
/// Rate limiting is reported as [`ProviderError::RateLimited`] so the retry
/// layer can back off.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Human-readable provider name (e.g. "opentdb").
    fn name(&self) -> &str;

    /// Issue a single request for a batch of questions.
    async fn request_batch(&self, request: &BatchRequest) -> Result<QuestionBatch, ProviderError>;
}
