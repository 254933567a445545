//! quizline-providers — question-bank provider integrations.
//!
//! Implements the `QuestionProvider` trait for Open Trivia DB over HTTP and
//! for a scripted in-memory bank, plus the configuration that selects and
//! parameterizes them.

pub mod config;
pub mod mock;
pub mod opentdb;

pub use config::{create_provider, load_config, load_config_from, QuizConfig};
pub use mock::ScriptedProvider;
pub use opentdb::OpenTdbProvider;
