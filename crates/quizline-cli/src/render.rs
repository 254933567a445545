//! Plain-text rendering of session snapshots.

use std::io::Write;

use comfy_table::{Cell, Table};

use quizline_core::session::SessionSummary;
use quizline_core::snapshot::{OptionMark, PhaseKind, SessionSnapshot};

/// Paint one snapshot. Question text is entity-decoded for the terminal.
pub fn render_snapshot(snap: &SessionSnapshot, out: &mut impl Write) -> std::io::Result<()> {
    if snap.loading {
        writeln!(out, "Loading quiz..")?;
        return Ok(());
    }

    match snap.phase {
        PhaseKind::Idle => writeln!(out, "No quiz data available.")?,
        PhaseKind::Loading => writeln!(out, "Loading quiz..")?,
        PhaseKind::Failed => {
            let message = snap.error.as_deref().unwrap_or("Failed to fetch quiz");
            writeln!(out, "Error: {message}")?;
        }
        PhaseKind::Finished => {
            if let Some(score) = snap.final_score {
                writeln!(out)?;
                writeln!(out, "Your Score")?;
                writeln!(out, "You scored {} out of {}", score.score, score.total)?;
            }
            writeln!(out, "[r] play again  [q] quit")?;
        }
        PhaseKind::Ready => render_question(snap, out)?,
    }
    Ok(())
}

fn render_question(snap: &SessionSnapshot, out: &mut impl Write) -> std::io::Result<()> {
    let Some(question) = &snap.question else {
        return Ok(());
    };

    writeln!(out)?;
    let mut heading = format!("Question {}", question.index + 1);
    if !question.category.is_empty() {
        heading.push_str(&format!(" ({}", decode_entities(&question.category)));
        if !question.difficulty.is_empty() {
            heading.push_str(&format!(", {}", question.difficulty));
        }
        heading.push(')');
    }
    writeln!(out, "{heading}")?;
    writeln!(out, "{}", decode_entities(&question.prompt))?;

    for (i, option) in question.options.iter().enumerate() {
        let radio = if option.selected { "(*)" } else { "( )" };
        let mark = match option.mark {
            OptionMark::Correct => "  [correct]",
            OptionMark::Incorrect => "  [incorrect]",
            OptionMark::Unmarked => "",
        };
        writeln!(
            out,
            "  {}) {radio} {}{mark}",
            i + 1,
            decode_entities(&option.text)
        )?;
    }

    if let Some(error) = &snap.error {
        writeln!(out, "Error: {error}")?;
    }
    writeln!(out, "Score: {}", snap.score)?;
    if snap.revealed {
        writeln!(out, "[n] next question  [f] final score  [r] restart  [q] quit")?;
    } else {
        writeln!(
            out,
            "[1-{}] select  [s] submit  [f] final score  [r] restart  [q] quit",
            question.options.len()
        )?;
    }
    Ok(())
}

/// Summary table for a finished session.
pub fn summary_table(summary: &SessionSummary) -> Table {
    let score = summary.final_score();
    let mut table = Table::new();
    table.set_header(vec!["Session", "Correct", "Questions", "Score %", "Duration"]);
    table.add_row(vec![
        Cell::new(summary.session_id.to_string()),
        Cell::new(score.score),
        Cell::new(score.total),
        Cell::new(format!("{:.1}%", score.percentage())),
        Cell::new(format!("{}s", summary.duration_secs())),
    ]);
    table
}

/// Decode the HTML entities question banks embed in text.
///
/// Handles numeric references and the common named ones; anything else is
/// left as-is.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "eacute" => 'é',
        "Eacute" => 'É',
        "egrave" => 'è',
        "aacute" => 'á',
        "iacute" => 'í',
        "oacute" => 'ó',
        "uacute" => 'ú',
        "ntilde" => 'ñ',
        "ouml" => 'ö',
        "uuml" => 'ü',
        "auml" => 'ä',
        "szlig" => 'ß',
        "rsquo" => '\u{2019}',
        "lsquo" => '\u{2018}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "hellip" => '\u{2026}',
        "shy" => '\u{ad}',
        _ => return None,
    };
    Some(c)
}
