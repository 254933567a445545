//! The `quizline play` command.

use std::io::{BufRead, Write};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizline_core::session::QuizSession;
use quizline_core::snapshot::{PhaseKind, SessionSnapshot};
use quizline_providers::create_provider;

use crate::commands::SourceArgs;
use crate::render::{render_snapshot, summary_table};

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    /// One-based option number.
    Select(usize),
    Submit,
    Next,
    Final,
    Restart,
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        return Input::Select(n);
    }
    match line.to_ascii_lowercase().as_str() {
        "s" | "submit" => Input::Submit,
        "n" | "next" => Input::Next,
        "f" | "final" => Input::Final,
        "r" | "restart" => Input::Restart,
        "q" | "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

/// How an interactive run ended.
#[derive(Debug)]
enum Outcome {
    /// The player left; the session may or may not be finished.
    Quit,
    /// The session could not start.
    Failed(String),
}

pub async fn execute(source: SourceArgs, seed: Option<u64>, json: bool) -> Result<()> {
    let config = source.resolve()?;
    let provider = create_provider(&config)?;

    tracing::info!(base_url = %config.base_url, category = config.category, "starting quiz");
    let mut session = QuizSession::new(provider, config.batch_request(), config.retry_policy());
    if let Some(seed) = seed {
        session = session.with_rng(StdRng::seed_from_u64(seed));
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let outcome = run_loop(&mut session, stdin.lock(), &mut stdout).await?;

    if let Outcome::Failed(message) = outcome {
        anyhow::bail!("{message}");
    }

    if let Some(summary) = session.summary() {
        tracing::info!(
            score = summary.score,
            total = summary.total,
            "quiz finished"
        );
        if json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("{}", summary_table(&summary));
        }
    }
    Ok(())
}

/// Drive a session from line-based input until the player quits.
async fn run_loop<R: BufRead, W: Write>(
    session: &mut QuizSession,
    input: R,
    out: &mut W,
) -> Result<Outcome> {
    writeln!(out, "Loading quiz..")?;
    out.flush()?;
    let mut snap = session.start().await;
    let mut lines = input.lines();

    loop {
        render_snapshot(&snap, out)?;
        if snap.phase == PhaseKind::Failed {
            let message = snap
                .error
                .clone()
                .unwrap_or_else(|| "Failed to fetch quiz".to_string());
            return Ok(Outcome::Failed(message));
        }
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            return Ok(Outcome::Quit);
        };

        snap = match parse_input(&line) {
            Input::Select(n) => match select_by_number(session, &snap, n) {
                Some(next) => next,
                None => {
                    writeln!(out, "No option {n}.")?;
                    snap
                }
            },
            Input::Submit => session.submit_current(),
            Input::Next => {
                if snap.revealed {
                    writeln!(out, "Loading next question..")?;
                    out.flush()?;
                }
                session.advance().await
            }
            Input::Final => session.finalize(),
            Input::Restart => {
                writeln!(out, "Loading quiz..")?;
                out.flush()?;
                session.restart().await
            }
            Input::Quit => return Ok(Outcome::Quit),
            Input::Unknown(other) => {
                writeln!(out, "Unknown command: {other:?}")?;
                snap
            }
        };
    }
}

fn select_by_number(
    session: &mut QuizSession,
    snap: &SessionSnapshot,
    n: usize,
) -> Option<SessionSnapshot> {
    let question = snap.question.as_ref()?;
    let option = question.options.get(n.checked_sub(1)?)?;
    Some(session.select_answer(question.index, option.text.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::Duration;

    use quizline_core::error::ProviderError;
    use quizline_core::model::{BatchRequest, Question};
    use quizline_core::retry::RetryPolicy;
    use quizline_core::snapshot::FinalScore;
    use quizline_providers::mock::{record, ScriptedProvider};

    const SEED: u64 = 2024;

    fn paris_provider() -> ScriptedProvider {
        ScriptedProvider::with_fixed_record(record(
            "What is the capital of France?",
            "Paris",
            &["Lyon", "Nice", "Rome"],
        ))
    }

    /// The option number `answer` will have in the first question for `SEED`.
    fn option_number(answer: &str) -> usize {
        let question = Question::from_record(
            record(
                "What is the capital of France?",
                "Paris",
                &["Lyon", "Nice", "Rome"],
            ),
            &mut StdRng::seed_from_u64(SEED),
        );
        question
            .answer_options()
            .iter()
            .position(|a| a == answer)
            .unwrap()
            + 1
    }

    fn session(provider: ScriptedProvider) -> QuizSession {
        QuizSession::new(
            Arc::new(provider),
            BatchRequest::default(),
            RetryPolicy::new(0, Duration::from_millis(1)),
        )
        .with_rng(StdRng::seed_from_u64(SEED))
    }

    async fn play(session: &mut QuizSession, input: &str) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = run_loop(session, Cursor::new(input.to_string()), &mut out)
            .await
            .unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_commands() {
        assert_eq!(parse_input(" 2 "), Input::Select(2));
        assert_eq!(parse_input("S"), Input::Submit);
        assert_eq!(parse_input("next"), Input::Next);
        assert_eq!(parse_input("f"), Input::Final);
        assert_eq!(parse_input("r"), Input::Restart);
        assert_eq!(parse_input("exit"), Input::Quit);
        assert_eq!(parse_input("huh"), Input::Unknown("huh".into()));
    }

    #[tokio::test]
    async fn wrong_answer_then_final_score() {
        let mut s = session(paris_provider());
        let input = format!("{}\ns\nf\nq\n", option_number("Rome"));

        let (outcome, text) = play(&mut s, &input).await;

        assert!(matches!(outcome, Outcome::Quit));
        assert!(text.contains("[incorrect]"), "{text}");
        assert!(text.contains("You scored 0 out of 1"), "{text}");
        assert_eq!(s.final_score(), Some(FinalScore { score: 0, total: 1 }));
    }

    #[tokio::test]
    async fn correct_answer_next_then_final_score() {
        let mut s = session(paris_provider());
        let input = format!("{}\ns\nn\nf\n", option_number("Paris"));

        let (_, text) = play(&mut s, &input).await;

        assert!(text.contains("Question 2"), "{text}");
        assert!(text.contains("You scored 1 out of 2"), "{text}");
    }

    #[tokio::test]
    async fn out_of_range_option_is_reported() {
        let mut s = session(paris_provider());

        let (_, text) = play(&mut s, "9\n0\nq\n").await;

        assert!(text.contains("No option 9."));
        assert!(text.contains("No option 0."));
        assert_eq!(s.selection(0), None);
    }

    #[tokio::test]
    async fn start_failure_ends_the_loop() {
        let provider = paris_provider().then(Err(ProviderError::ApiError {
            status: 500,
            message: "down".into(),
        }));
        let mut s = session(provider);

        let (outcome, text) = play(&mut s, "1\ns\n").await;

        match outcome {
            Outcome::Failed(message) => {
                assert_eq!(message, "Something went wrong while fetching the data")
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(text.contains("Error: Something went wrong"));
    }

    #[tokio::test]
    async fn failed_next_question_keeps_playing() {
        let provider = paris_provider()
            .then(Ok(quizline_providers::mock::batch_of(record(
                "What is the capital of France?",
                "Paris",
                &["Lyon", "Nice", "Rome"],
            ))))
            .then(Err(ProviderError::NetworkError("reset".into())));
        let mut s = session(provider);
        let input = format!("{}\ns\nn\nf\n", option_number("Paris"));

        let (_, text) = play(&mut s, &input).await;

        assert!(text.contains("Error: Failed to load next question"), "{text}");
        assert!(text.contains("You scored 1 out of 1"), "{text}");
    }

    #[tokio::test]
    async fn restart_after_finish() {
        let mut s = session(paris_provider());

        let (_, text) = play(&mut s, "s\nf\nr\nq\n").await;

        assert!(text.contains("You scored 0 out of 1"));
        assert!(text.matches("Question 1").count() >= 2, "{text}");
        assert_eq!(s.final_score(), None);
    }

    #[tokio::test]
    async fn end_of_input_quits() {
        let mut s = session(paris_provider());

        let (outcome, _) = play(&mut s, "").await;

        assert!(matches!(outcome, Outcome::Quit));
    }
}
