//! Quiz configuration and provider factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizline_core::model::{BatchRequest, DEFAULT_CATEGORY};
use quizline_core::retry::RetryPolicy;
use quizline_core::traits::QuestionProvider;

use crate::opentdb::{OpenTdbProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Top-level quizline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Question bank base URL. `${VAR}` references are expanded.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Provider category id.
    #[serde(default = "default_category")]
    pub category: u32,
    /// Question type ("multiple" or "boolean").
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Retries on rate limiting.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds, doubled on each retry.
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_category() -> u32 {
    DEFAULT_CATEGORY
}
fn default_kind() -> String {
    "multiple".to_string()
}
fn default_retries() -> u32 {
    3
}
fn default_initial_delay() -> u64 {
    1000
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            category: default_category(),
            kind: default_kind(),
            max_retries: default_retries(),
            initial_delay_ms: default_initial_delay(),
            timeout_secs: default_timeout(),
        }
    }
}

impl QuizConfig {
    /// The fixed single-question request every session sends.
    pub fn batch_request(&self) -> BatchRequest {
        BatchRequest::single(self.category, self.kind.clone())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.initial_delay_ms))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizline.toml` in the current directory
/// 2. `~/.config/quizline/config.toml`
///
/// Environment variable override: `QUIZLINE_BASE_URL`.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizline.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    if let Ok(url) = std::env::var("QUIZLINE_BASE_URL") {
        config.base_url = url;
    }
    config.base_url = resolve_env_vars(&config.base_url);

    anyhow::ensure!(
        config.initial_delay_ms > 0,
        "initial_delay_ms must be greater than zero"
    );
    anyhow::ensure!(!config.kind.is_empty(), "kind must not be empty");

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizline"))
}

/// Create the question provider described by a configuration.
pub fn create_provider(config: &QuizConfig) -> Result<Arc<dyn QuestionProvider>> {
    let provider = OpenTdbProvider::new(Some(config.base_url.clone()), config.timeout_secs)
        .context("failed to build HTTP client")?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZLINE_TEST_VAR", "localhost:8080");
        assert_eq!(resolve_env_vars("${_QUIZLINE_TEST_VAR}"), "localhost:8080");
        assert_eq!(
            resolve_env_vars("http://${_QUIZLINE_TEST_VAR}/trivia"),
            "http://localhost:8080/trivia"
        );
        std::env::remove_var("_QUIZLINE_TEST_VAR");
    }

    #[test]
    fn unterminated_reference_is_left_alone() {
        assert_eq!(resolve_env_vars("http://${HOST"), "http://${HOST");
    }

    #[test]
    fn default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.base_url, "https://opentdb.com");
        assert_eq!(config.category, 27);
        assert_eq!(config.max_retries, 3);
        assert_eq!(
            config.retry_policy(),
            RetryPolicy::new(3, Duration::from_millis(1000))
        );
        assert_eq!(config.batch_request(), BatchRequest::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
category = 9
max_retries = 5
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.category, 9);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.kind, "multiple");
        assert_eq!(config.initial_delay_ms, 1000);
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizline.toml");
        std::fs::write(&path, "kind = \"boolean\"\ninitial_delay_ms = 250\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();

        assert_eq!(config.kind, "boolean");
        assert_eq!(config.initial_delay_ms, 250);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/quizline.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn zero_delay_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizline.toml");
        std::fs::write(&path, "initial_delay_ms = 0\n").unwrap();

        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("initial_delay_ms"));
    }
}
