//! The `quizline init` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn execute(dir: PathBuf) -> Result<()> {
    let path = dir.join("quizline.toml");
    if path.exists() {
        println!("quizline.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write(&path, SAMPLE_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created quizline.toml");

    println!("\nNext steps:");
    println!("  1. Pick a category in quizline.toml (see https://opentdb.com/api_config.php)");
    println!("  2. Run: quizline play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizline configuration

base_url = "https://opentdb.com"
category = 27
kind = "multiple"

# Rate-limit backoff: waits initial_delay_ms, then doubles, max_retries times.
max_retries = 3
initial_delay_ms = 1000

timeout_secs = 30
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quizline_providers::config::{load_config_from, QuizConfig};

    #[test]
    fn sample_config_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        execute(dir.path().to_path_buf()).unwrap();

        let config = load_config_from(Some(&dir.path().join("quizline.toml"))).unwrap();
        let expected = QuizConfig {
            base_url: config.base_url.clone(),
            ..QuizConfig::default()
        };
        assert_eq!(config, expected);
    }
}
