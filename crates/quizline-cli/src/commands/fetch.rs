//! The `quizline fetch` command.

use anyhow::Result;

use quizline_core::retry::fetch_question_batch;
use quizline_core::FetchError;
use quizline_providers::create_provider;

use crate::commands::SourceArgs;

pub async fn execute(source: SourceArgs) -> Result<()> {
    let config = source.resolve()?;
    let provider = create_provider(&config)?;
    let request = config.batch_request();
    tracing::info!(base_url = %config.base_url, category = request.category, "fetching one question");

    let batch = fetch_question_batch(provider.as_ref(), &request, &config.retry_policy())
        .await
        .map_err(fetch_failure)?;

    println!("{}", serde_json::to_string_pretty(&batch.results)?);
    Ok(())
}

/// Player-facing message first, technical cause after it.
fn fetch_failure(err: FetchError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_leads_with_user_message() {
        let err = fetch_failure(FetchError::RateLimited { attempts: 4 });
        assert_eq!(
            format!("{err:#}"),
            "API rate limit reached. Wait a moment and refresh.: rate limit reached after 4 attempts"
        );
        assert_eq!(
            err.to_string(),
            "API rate limit reached. Wait a moment and refresh."
        );
    }
}
