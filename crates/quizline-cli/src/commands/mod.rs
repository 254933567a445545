pub mod fetch;
pub mod init;
pub mod play;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use quizline_providers::config::{load_config_from, QuizConfig};

/// Where questions come from and how patiently to ask for them.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Question bank base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Question category id
    #[arg(long)]
    pub category: Option<u32>,

    /// Retries when rate limited
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Delay before the first retry, in milliseconds
    #[arg(long)]
    pub initial_delay_ms: Option<u64>,
}

impl SourceArgs {
    /// Load the config file and apply command-line overrides on top.
    pub fn resolve(&self) -> Result<QuizConfig> {
        let mut config = load_config_from(self.config.as_deref())?;
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(category) = self.category {
            config.category = category;
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if let Some(delay) = self.initial_delay_ms {
            anyhow::ensure!(delay > 0, "initial delay must be greater than zero");
            config.initial_delay_ms = delay;
        }
        Ok(config)
    }
}
