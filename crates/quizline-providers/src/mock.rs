//! Scripted provider for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizline_core::error::ProviderError;
use quizline_core::model::{BatchRequest, QuestionBatch, TriviaRecord};
use quizline_core::traits::QuestionProvider;

/// A question provider that replays scripted outcomes without any I/O.
///
/// Outcomes are served in order; once exhausted, every call returns the
/// fallback record.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<QuestionBatch, ProviderError>>>,
    fallback: TriviaRecord,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<BatchRequest>>,
}

impl ScriptedProvider {
    /// Create a provider that always answers with `record`.
    pub fn with_fixed_record(record: TriviaRecord) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: record,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Queue an outcome to be served before the fallback.
    pub fn then(self, outcome: Result<QuestionBatch, ProviderError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
        self
    }

    /// Queue `n` rate-limit responses.
    pub fn then_rate_limited(mut self, n: usize) -> Self {
        for _ in 0..n {
            self = self.then(Err(ProviderError::RateLimited));
        }
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<BatchRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Wrap a single record in a successful batch.
pub fn batch_of(record: TriviaRecord) -> QuestionBatch {
    QuestionBatch {
        response_code: 0,
        results: vec![record],
    }
}

/// Build a multiple-choice record from plain strings.
pub fn record(question: &str, correct: &str, incorrect: &[&str]) -> TriviaRecord {
    TriviaRecord {
        question: question.to_string(),
        correct_answer: correct.to_string(),
        incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
        category: String::new(),
        difficulty: String::new(),
        kind: "multiple".to_string(),
    }
}

#[async_trait]
impl QuestionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn request_batch(&self, request: &BatchRequest) -> Result<QuestionBatch, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(request.clone());

        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        next.unwrap_or_else(|| Ok(batch_of(self.fallback.clone())))
    }
}
