//! The `wiscar validate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use wiscar_core::parser::{self, Severity};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let files = if bank_path.is_dir() {
        toml_files(&bank_path)?
    } else {
        vec![bank_path]
    };

    let mut total_warnings = 0;
    let mut failed = 0;

    for file in &files {
        let bank = match parser::parse_question_bank(file) {
            Ok(bank) => bank,
            Err(e) => {
                println!("{}: ERROR: {e:#}", file.display());
                failed += 1;
                continue;
            }
        };
        println!(
            "Question bank: {} ({} phases, {} questions)",
            bank.name,
            bank.phases.len(),
            bank.total_questions()
        );

        let warnings: Vec<_> = parser::validate_question_bank(&bank)
            .into_iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect();
        for w in &warnings {
            let prefix = match (&w.phase_id, &w.question_id) {
                (Some(phase), Some(question)) => format!("  [{phase}/{question}]"),
                (Some(phase), None) => format!("  [{phase}]"),
                _ => "  ".to_string(),
            };
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} question bank(s) failed validation", files.len());
    }
    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

/// Every `.toml` file under `dir`, recursively, in path order.
fn toml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            files.extend(toml_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    Ok(files)
}
