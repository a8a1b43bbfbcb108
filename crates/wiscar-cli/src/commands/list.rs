//! The `wiscar list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use wiscar_core::parser::load_bank_directory;

pub fn execute(dir: PathBuf) -> Result<()> {
    let banks = load_bank_directory(&dir)?;

    if banks.is_empty() {
        println!(
            "No question banks found in {}. Run `wiscar init` to create one.",
            dir.display()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Subject", "Phases", "Questions"]);
    for bank in &banks {
        table.add_row(vec![
            Cell::new(&bank.id),
            Cell::new(&bank.name),
            Cell::new(&bank.subject),
            Cell::new(bank.phases.len()),
            Cell::new(bank.total_questions()),
        ]);
    }
    println!("{table}");

    Ok(())
}
