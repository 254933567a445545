//! Core data model types for quizline.
//!
//! Wire records as the question bank returns them, the request shape sent to
//! it, and the `Question` a session actually plays.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Open Trivia DB category for "Animals".
pub const DEFAULT_CATEGORY: u32 = 27;

/// In-body response code Open Trivia DB uses for rate limiting.
pub const RESPONSE_CODE_RATE_LIMIT: u8 = 5;

/// A request for one batch of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Number of questions. Sessions always ask for one.
    pub amount: u32,
    /// Provider category id.
    pub category: u32,
    /// Question type, e.g. "multiple" or "boolean".
    pub kind: String,
}

impl BatchRequest {
    /// A request for a single question of the given category and type.
    pub fn single(category: u32, kind: impl Into<String>) -> Self {
        Self {
            amount: 1,
            category,
            kind: kind.into(),
        }
    }
}

impl Default for BatchRequest {
    fn default() -> Self {
        Self::single(DEFAULT_CATEGORY, "multiple")
    }
}

/// One question record exactly as the provider sends it.
///
/// Text fields may carry HTML entities or markup; they are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaRecord {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// The body of one provider response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBatch {
    #[serde(default)]
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<TriviaRecord>,
}

/// A playable question with its answer options fixed in shuffled order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    prompt: String,
    correct_answer: String,
    answer_options: Vec<String>,
    category: String,
    difficulty: String,
}

impl Question {
    /// Build a question from a wire record, shuffling its options once.
    pub fn from_record<R: Rng + ?Sized>(record: TriviaRecord, rng: &mut R) -> Self {
        let TriviaRecord {
            question,
            correct_answer,
            incorrect_answers,
            category,
            difficulty,
            ..
        } = record;

        let mut answer_options: Vec<String> = incorrect_answers
            .into_iter()
            .filter(|a| *a != correct_answer)
            .collect();
        answer_options.push(correct_answer.clone());
        answer_options.shuffle(rng);

        Self {
            prompt: question,
            correct_answer,
            answer_options,
            category,
            difficulty,
        }
    }

    /// Question text, possibly with markup.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Options in the order they were shuffled at load time.
    pub fn answer_options(&self) -> &[String] {
        &self.answer_options
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    /// Exact string comparison against the canonical answer.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn paris() -> TriviaRecord {
        TriviaRecord {
            question: "What is the capital of France?".into(),
            correct_answer: "Paris".into(),
            incorrect_answers: vec!["Lyon".into(), "Nice".into(), "Rome".into()],
            category: "Geography".into(),
            difficulty: "easy".into(),
            kind: "multiple".into(),
        }
    }

    #[test]
    fn options_are_union_with_single_correct_answer() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let q = Question::from_record(paris(), &mut rng);
            let mut sorted = q.answer_options().to_vec();
            sorted.sort();
            assert_eq!(sorted, vec!["Lyon", "Nice", "Paris", "Rome"]);
            let hits = q.answer_options().iter().filter(|a| *a == "Paris").count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn duplicated_correct_answer_is_dropped() {
        let mut record = paris();
        record.incorrect_answers.push("Paris".into());
        let q = Question::from_record(record, &mut StdRng::seed_from_u64(1));
        assert_eq!(q.answer_options().len(), 4);
        assert_eq!(
            q.answer_options().iter().filter(|a| *a == "Paris").count(),
            1
        );
    }

    #[test]
    fn shuffle_reaches_every_position() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let q = Question::from_record(paris(), &mut rng);
            let pos = q
                .answer_options()
                .iter()
                .position(|a| a == "Paris")
                .unwrap();
            seen[pos] = true;
        }
        assert!(seen.iter().all(|s| *s), "positions seen: {seen:?}");
    }

    #[test]
    fn comparison_is_exact() {
        let q = Question::from_record(paris(), &mut StdRng::seed_from_u64(3));
        assert!(q.is_correct("Paris"));
        assert!(!q.is_correct("paris"));
        assert!(!q.is_correct("Paris "));
    }

    #[test]
    fn parse_opentdb_body() {
        let body = r#"{
            "response_code": 0,
            "results": [{
                "type": "multiple",
                "difficulty": "medium",
                "category": "Animals",
                "question": "What is the fastest land animal?",
                "correct_answer": "Cheetah",
                "incorrect_answers": ["Lion", "Thomson&#039;s Gazelle", "Pronghorn Antelope"]
            }]
        }"#;
        let batch: QuestionBatch = serde_json::from_str(body).unwrap();
        assert_eq!(batch.response_code, 0);
        assert_eq!(batch.results.len(), 1);
        assert_eq!(batch.results[0].kind, "multiple");
        assert_eq!(batch.results[0].incorrect_answers[1], "Thomson&#039;s Gazelle");
    }

    #[test]
    fn default_request_is_single_animals_multiple() {
        let req = BatchRequest::default();
        assert_eq!(req.amount, 1);
        assert_eq!(req.category, 27);
        assert_eq!(req.kind, "multiple");
    }
}
