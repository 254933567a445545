//! Open Trivia DB provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use quizline_core::error::ProviderError;
use quizline_core::model::{BatchRequest, QuestionBatch};
use quizline_core::traits::QuestionProvider;

pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Open Trivia DB (or any server speaking its `api.php` protocol).
pub struct OpenTdbProvider {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenTdbProvider {
    pub fn new(base_url: Option<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl QuestionProvider for OpenTdbProvider {
    fn name(&self) -> &str {
        "opentdb"
    }

    #[instrument(skip(self, request), fields(category = request.category, kind = %request.kind))]
    async fn request_batch(&self, request: &BatchRequest) -> Result<QuestionBatch, ProviderError> {
        let url = format!(
            "{}/api.php?amount={}&category={}&type={}",
            self.base_url, request.amount, request.category, request.kind
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError { status, message });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;
        let batch: QuestionBatch = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse response: {e}")))?;

        tracing::debug!(
            response_code = batch.response_code,
            results = batch.results.len(),
            "question batch received"
        );
        Ok(batch)
    }
}
