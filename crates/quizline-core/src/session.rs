//! Quiz session controller.
//!
//! Drives one play-through: load a question, capture the player's answer,
//! reveal it, score it, and move on to a freshly fetched question until the
//! player asks for the final score. Every operation takes `&mut self` and
//! returns the resulting [`SessionSnapshot`], so a renderer never observes a
//! half-applied transition.
//!
//! Operations that make no sense in the current state (submitting twice,
//! advancing before a reveal, answering a revealed question) are ignored and
//! logged at `debug` level rather than reported as errors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FetchError;
use crate::model::{BatchRequest, Question};
use crate::retry::{fetch_question_batch, RetryPolicy};
use crate::snapshot::{
    FinalScore, OptionMark, OptionView, PhaseKind, QuestionView, SessionSnapshot,
};
use crate::traits::QuestionProvider;

/// Shown when fetching the next question fails mid-session.
pub const ADVANCE_FAILED_MESSAGE: &str = "Failed to load next question";

/// Lifecycle state of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Created, `start` not yet called.
    Idle,
    /// Waiting on the first question.
    Loading,
    /// A question is current; see `revealed` for its sub-state.
    Ready,
    Finished,
    /// The first question could not be loaded.
    Failed(FetchError),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Loading => PhaseKind::Loading,
            Phase::Ready => PhaseKind::Ready,
            Phase::Finished => PhaseKind::Finished,
            Phase::Failed(_) => PhaseKind::Failed,
        }
    }
}

/// A non-fatal problem attached to an otherwise usable session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    /// The next question could not be fetched; `advance` may be retried.
    AdvanceFailed(FetchError),
}

/// Summary of a finished session, suitable for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub score: u32,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn final_score(&self) -> FinalScore {
        FinalScore {
            score: self.score,
            total: self.total,
        }
    }

    pub fn duration_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// The quiz session controller.
pub struct QuizSession {
    provider: Arc<dyn QuestionProvider>,
    request: BatchRequest,
    policy: RetryPolicy,
    rng: StdRng,

    id: Uuid,
    phase: Phase,
    has_started: bool,
    questions: Vec<Question>,
    current_index: usize,
    selections: HashMap<usize, String>,
    revealed: bool,
    scored: HashSet<usize>,
    score: u32,
    notice: Option<SessionNotice>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    pub fn new(
        provider: Arc<dyn QuestionProvider>,
        request: BatchRequest,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            request,
            policy,
            rng: StdRng::from_entropy(),
            id: Uuid::new_v4(),
            phase: Phase::Idle,
            has_started: false,
            questions: Vec::new(),
            current_index: 0,
            selections: HashMap::new(),
            revealed: false,
            scored: HashSet::new(),
            score: 0,
            notice: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// Use a specific RNG for shuffling answer options.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn selection(&self, index: usize) -> Option<&str> {
        self.selections.get(&index).map(String::as_str)
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn notice(&self) -> Option<&SessionNotice> {
        self.notice.as_ref()
    }

    /// Load the first question. Only the first call on a session does anything.
    pub async fn start(&mut self) -> SessionSnapshot {
        if self.has_started {
            tracing::debug!(session = %self.id, "start ignored, session already started");
            return self.snapshot();
        }
        self.has_started = true;
        self.started_at = Some(Utc::now());
        self.phase = Phase::Loading;
        tracing::info!(session = %self.id, provider = self.provider.name(), "loading quiz");

        match self.load_question().await {
            Ok(question) => {
                self.questions.push(question);
                self.current_index = 0;
                self.revealed = false;
                self.phase = Phase::Ready;
                tracing::info!(session = %self.id, "first question loaded");
            }
            Err(e) => {
                tracing::error!(session = %self.id, "failed to load quiz: {e}");
                self.phase = Phase::Failed(e);
            }
        }

        self.trace_state();
        self.snapshot()
    }

    /// Record the player's choice for a question, replacing any earlier one.
    ///
    /// Rejected once that question is revealed. Only the current question's
    /// selection is ever read by scoring.
    pub fn select_answer(&mut self, index: usize, answer: impl Into<String>) -> SessionSnapshot {
        let answer = answer.into();
        if self.phase != Phase::Ready || index >= self.questions.len() {
            tracing::debug!(session = %self.id, index, "selection ignored, no such question");
        } else if index == self.current_index && self.revealed {
            tracing::debug!(session = %self.id, index, "selection ignored, question already revealed");
        } else {
            tracing::debug!(session = %self.id, index, answer = %answer, "answer selected");
            self.selections.insert(index, answer);
        }
        self.snapshot()
    }

    /// Reveal the current question's answer. Does not touch the score.
    pub fn submit_current(&mut self) -> SessionSnapshot {
        if self.phase == Phase::Ready && !self.revealed {
            self.revealed = true;
            tracing::debug!(session = %self.id, index = self.current_index, "answer revealed");
            self.trace_state();
        } else {
            tracing::debug!(session = %self.id, "submit ignored");
        }
        self.snapshot()
    }

    /// Score the revealed question and move on to a newly fetched one.
    ///
    /// A failed fetch leaves the session on the already-scored question with
    /// a notice attached; calling `advance` again retries the fetch without
    /// scoring twice.
    pub async fn advance(&mut self) -> SessionSnapshot {
        if self.phase != Phase::Ready || !self.revealed {
            tracing::debug!(session = %self.id, "advance ignored, current question not revealed");
            return self.snapshot();
        }

        self.score_current();

        match self.load_question().await {
            Ok(question) => {
                self.questions.push(question);
                self.current_index += 1;
                self.revealed = false;
                self.notice = None;
                tracing::info!(
                    session = %self.id,
                    index = self.current_index,
                    "next question loaded"
                );
            }
            Err(e) => {
                tracing::warn!(session = %self.id, "failed to fetch next question: {e}");
                self.notice = Some(SessionNotice::AdvanceFailed(e));
            }
        }

        self.trace_state();
        self.snapshot()
    }

    /// End the session, awarding a revealed but not yet scored question.
    pub fn finalize(&mut self) -> SessionSnapshot {
        if self.phase != Phase::Ready {
            tracing::debug!(session = %self.id, "finalize ignored");
            return self.snapshot();
        }
        if self.revealed {
            self.score_current();
        }
        self.phase = Phase::Finished;
        self.finished_at = Some(Utc::now());
        tracing::info!(
            session = %self.id,
            score = self.score,
            total = self.questions.len(),
            "quiz finished"
        );
        self.snapshot()
    }

    /// `(score, questions loaded)` once the session is finished.
    pub fn final_score(&self) -> Option<FinalScore> {
        (self.phase == Phase::Finished).then(|| FinalScore {
            score: self.score,
            total: self.questions.len(),
        })
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        let score = self.final_score()?;
        Some(SessionSummary {
            session_id: self.id,
            score: score.score,
            total: score.total,
            started_at: self.started_at?,
            finished_at: self.finished_at?,
        })
    }

    /// Throw the whole session away and start over.
    pub async fn restart(&mut self) -> SessionSnapshot {
        tracing::info!(session = %self.id, "restarting quiz");
        self.id = Uuid::new_v4();
        self.phase = Phase::Idle;
        self.has_started = false;
        self.questions.clear();
        self.current_index = 0;
        self.selections.clear();
        self.revealed = false;
        self.scored.clear();
        self.score = 0;
        self.notice = None;
        self.started_at = None;
        self.finished_at = None;
        self.start().await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let error = match (&self.phase, &self.notice) {
            (Phase::Failed(e), _) => Some(e.user_message().to_string()),
            (_, Some(SessionNotice::AdvanceFailed(_))) => Some(ADVANCE_FAILED_MESSAGE.to_string()),
            _ => None,
        };

        let question = match self.phase {
            Phase::Ready => self.current_question().map(|q| self.question_view(q)),
            _ => None,
        };

        SessionSnapshot {
            session_id: self.id,
            phase: self.phase.kind(),
            loading: self.phase == Phase::Loading,
            error,
            question,
            revealed: self.revealed,
            score: self.score,
            questions_loaded: self.questions.len(),
            final_score: self.final_score(),
        }
    }

    fn question_view(&self, question: &Question) -> QuestionView {
        let selected = self.selection(self.current_index);
        let options = question
            .answer_options()
            .iter()
            .map(|text| {
                let is_selected = selected == Some(text.as_str());
                let mark = if !self.revealed {
                    OptionMark::Unmarked
                } else if question.is_correct(text) {
                    OptionMark::Correct
                } else if is_selected {
                    OptionMark::Incorrect
                } else {
                    OptionMark::Unmarked
                };
                OptionView {
                    text: text.clone(),
                    selected: is_selected,
                    mark,
                }
            })
            .collect();

        QuestionView {
            index: self.current_index,
            prompt: question.prompt().to_string(),
            category: question.category().to_string(),
            difficulty: question.difficulty().to_string(),
            options,
        }
    }

    /// Award the current question's point at most once per session.
    fn score_current(&mut self) {
        let index = self.current_index;
        if !self.scored.insert(index) {
            return;
        }
        let correct = match (self.questions.get(index), self.selections.get(&index)) {
            (Some(question), Some(answer)) => question.is_correct(answer),
            _ => false,
        };
        if correct {
            self.score += 1;
        }
        tracing::debug!(session = %self.id, index, correct, score = self.score, "question scored");
    }

    async fn load_question(&mut self) -> Result<Question, FetchError> {
        let batch =
            fetch_question_batch(self.provider.as_ref(), &self.request, &self.policy).await?;
        if batch.results.len() > 1 {
            tracing::debug!(
                count = batch.results.len(),
                "provider returned extra questions, keeping the first"
            );
        }
        let record = batch
            .results
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::FetchFailed("empty question batch".into()))?;
        Ok(Question::from_record(record, &mut self.rng))
    }

    fn trace_state(&self) {
        tracing::debug!(
            session = %self.id,
            current_index = self.current_index,
            revealed = self.revealed,
            score = self.score,
            "session state"
        );
    }
}
