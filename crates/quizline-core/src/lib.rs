//! quizline-core — Quiz session controller, retry policy, and data model.
//!
//! This crate defines the question model, the provider trait, the
//! fetch-with-retry strategy, and the session state machine that the rest of
//! quizline builds on.

pub mod error;
pub mod model;
pub mod retry;
pub mod session;
pub mod snapshot;
pub mod traits;

pub use error::{FetchError, ProviderError};
pub use model::{BatchRequest, Question, QuestionBatch, TriviaRecord};
pub use retry::{fetch_question_batch, RetryPolicy};
pub use session::{Phase, QuizSession, SessionNotice, SessionSummary};
pub use snapshot::{FinalScore, OptionMark, OptionView, PhaseKind, QuestionView, SessionSnapshot};
pub use traits::QuestionProvider;
