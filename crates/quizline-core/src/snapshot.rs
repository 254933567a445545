//! Read-only views of a session for renderers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse lifecycle state, as a renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Idle,
    Loading,
    Ready,
    Finished,
    Failed,
}

/// Correctness coloring for an option once the question is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionMark {
    Unmarked,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    pub text: String,
    pub selected: bool,
    pub mark: OptionMark,
}

/// The question currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    /// Zero-based position in the session.
    pub index: usize,
    pub prompt: String,
    pub category: String,
    pub difficulty: String,
    pub options: Vec<OptionView>,
}

/// Reportable result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub score: u32,
    pub total: usize,
}

impl FinalScore {
    /// Share of questions answered correctly, in percent.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.score as f64 * 100.0 / self.total as f64
        }
    }
}

/// Everything a renderer needs to paint the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: PhaseKind,
    pub loading: bool,
    /// User-facing error message, fatal or not.
    pub error: Option<String>,
    pub question: Option<QuestionView>,
    pub revealed: bool,
    pub score: u32,
    pub questions_loaded: usize,
    pub final_score: Option<FinalScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_handles_empty_session() {
        assert_eq!(FinalScore { score: 0, total: 0 }.percentage(), 0.0);
        assert_eq!(FinalScore { score: 1, total: 4 }.percentage(), 25.0);
    }

    #[test]
    fn phase_serializes_lowercase() {
        let json = serde_json::to_string(&PhaseKind::Finished).unwrap();
        assert_eq!(json, "\"finished\"");
    }
}
