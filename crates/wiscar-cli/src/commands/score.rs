//! The `wiscar score` command.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use wiscar_core::engine::AssessmentSession;
use wiscar_core::parser;
use wiscar_core::report::AssessmentReport;
use wiscar_core::scoring::WiscarScorer;

use crate::config::load_config_from;
use crate::output::{export_report, print_result, ExportFormat};

pub fn execute(
    bank: Option<PathBuf>,
    answers_path: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let formats = ExportFormat::parse_list(format.as_deref().unwrap_or(&config.format))?;
    let bank = Arc::new(parser::parse_question_bank(&config.bank_path(bank)?)?);
    let answers = parser::load_answers(&answers_path, &bank)?;

    let mut session = AssessmentSession::new(Arc::clone(&bank))?;
    session
        .replay(&answers)
        .with_context(|| format!("answers in {} do not complete the assessment", answers_path.display()))?;

    let scorer = WiscarScorer::new(config.scoring.clone());
    let result = session.compute_result(&scorer)?;
    let report = AssessmentReport::new(&session.answer_sheet(), result);

    let mut out = io::stdout().lock();
    print_result(&mut out, &report)?;

    let output = output.unwrap_or(config.output_dir);
    for path in export_report(&report, &formats, &output, &config.radar)? {
        writeln!(out, "Saved: {}", path.display())?;
    }
    Ok(())
}
