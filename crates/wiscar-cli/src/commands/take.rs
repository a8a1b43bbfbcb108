//! The `wiscar take` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use wiscar_core::engine::{AssessmentSession, Transition};
use wiscar_core::model::QuestionKind;
use wiscar_core::parser;
use wiscar_core::report::AssessmentReport;
use wiscar_core::scoring::WiscarScorer;

use crate::config::load_config_from;
use crate::output::{export_report, print_result, ExportFormat};

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    Quit,
}

pub fn execute(
    bank: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let formats = ExportFormat::parse_list(format.as_deref().unwrap_or(&config.format))?;
    let bank = Arc::new(parser::parse_question_bank(&config.bank_path(bank)?)?);
    let mut session = AssessmentSession::new(bank)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if run_session(&mut session, stdin.lock(), &mut out)? == SessionEnd::Quit {
        writeln!(out, "\nAssessment abandoned; nothing was saved.")?;
        return Ok(());
    }

    let scorer = WiscarScorer::new(config.scoring.clone());
    let result = session.compute_result(&scorer)?;
    let report = AssessmentReport::new(&session.answer_sheet(), result);
    print_result(&mut out, &report)?;

    let output = output.unwrap_or(config.output_dir);
    for path in export_report(&report, &formats, &output, &config.radar)? {
        writeln!(out, "Saved: {}", path.display())?;
    }
    Ok(())
}

/// Drive a session from line-based input until it completes or the user quits.
///
/// On a question: a number (scale value or option number), option text or
/// free text answers it; `b` goes back; `q` quits; an empty line keeps an
/// existing answer. On a bookend phase any line continues. End of input quits.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut AssessmentSession,
    mut input: R,
    out: &mut W,
) -> Result<SessionEnd> {
    let mut line = String::new();

    while !session.is_complete() {
        let position = session.position();
        let question = session.current_question().ok().cloned();

        match &question {
            None => {
                let phase = &session.bank().phases[position.phase_index];
                writeln!(out, "\n== {} ==", phase.title)?;
                if !phase.description.is_empty() {
                    writeln!(out, "{}", phase.description)?;
                }
                write!(out, "Press Enter to continue (q to quit): ")?;
            }
            Some(q) => {
                writeln!(
                    out,
                    "\n[{}] Question {} of {}",
                    position.phase_title, position.question_number, position.total_questions
                )?;
                writeln!(out, "{}", q.prompt)?;
                match &q.kind {
                    QuestionKind::Choice { options, .. } => {
                        for (i, option) in options.iter().enumerate() {
                            writeln!(out, "  {}. {option}", i + 1)?;
                        }
                    }
                    QuestionKind::Scale { min, max, labels } => match labels {
                        Some(l) => writeln!(out, "  {min} ({}) .. {max} ({})", l.min, l.max)?,
                        None => writeln!(out, "  {min} .. {max}")?,
                    },
                    QuestionKind::FreeText => {}
                }
                if let Some(existing) = session
                    .answers(position.phase_index)
                    .and_then(|r| r.get(&q.id))
                {
                    writeln!(out, "  (current answer: {existing})")?;
                }
                let back = if position.is_first { "" } else { ", b to go back" };
                write!(out, "> (q to quit{back}) ")?;
            }
        }
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(SessionEnd::Quit);
        }
        let entry = line.trim();

        match entry {
            "q" => return Ok(SessionEnd::Quit),
            "b" => {
                if session.retreat() == Transition::Stayed {
                    writeln!(out, "  Already at the first question.")?;
                }
                continue;
            }
            _ => {}
        }

        if let Some(q) = &question {
            let already_answered = session
                .answers(position.phase_index)
                .is_some_and(|r| r.contains_key(&q.id));
            if !(entry.is_empty() && already_answered) {
                let recorded = q
                    .parse_input(entry)
                    .and_then(|value| session.answer_current(value));
                if let Err(e) = recorded {
                    if !e.is_input_error() {
                        return Err(e.into());
                    }
                    writeln!(out, "  {e}")?;
                    continue;
                }
            }
        }

        match session.advance() {
            Ok(Transition::Completed) => writeln!(out, "\nAll questions answered.")?,
            Ok(_) => {}
            Err(e) if e.is_input_error() => writeln!(out, "  {e}")?,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(SessionEnd::Completed)
}
