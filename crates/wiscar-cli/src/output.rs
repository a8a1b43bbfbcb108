//! Result tables and report export shared by `take` and `score`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use wiscar_core::radar::{layout, RadarConfig};
use wiscar_core::report::AssessmentReport;
use wiscar_core::results::ScoreBand;
use wiscar_report::html::write_html_report;
use wiscar_report::svg::{render_radar, RadarStyle};

/// A single export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Html,
    Svg,
    Markdown,
}

impl ExportFormat {
    /// Parse `json`, `html`, `svg`, `markdown`/`md`, `all`, or a comma-separated list.
    pub fn parse_list(s: &str) -> Result<Vec<ExportFormat>> {
        if s.trim() == "all" {
            return Ok(vec![
                ExportFormat::Json,
                ExportFormat::Html,
                ExportFormat::Svg,
                ExportFormat::Markdown,
            ]);
        }
        let mut formats = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let format = match part {
                "json" => ExportFormat::Json,
                "html" => ExportFormat::Html,
                "svg" => ExportFormat::Svg,
                "markdown" | "md" => ExportFormat::Markdown,
                other => anyhow::bail!(
                    "unknown export format '{other}' (expected json, html, svg, markdown or all)"
                ),
            };
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        anyhow::ensure!(!formats.is_empty(), "at least one export format is required");
        Ok(formats)
    }

    fn file_name(&self, stem: &str) -> String {
        match self {
            ExportFormat::Json => format!("{stem}.json"),
            ExportFormat::Html => format!("{stem}.html"),
            ExportFormat::Svg => format!("{stem}-radar.svg"),
            ExportFormat::Markdown => format!("{stem}.md"),
        }
    }
}

/// Print the result summary and WISCAR table.
pub fn print_result(out: &mut impl Write, report: &AssessmentReport) -> Result<()> {
    let result = &report.result;

    let mut table = Table::new();
    table.set_header(vec!["Dimension", "Score", "Band"]);
    for (label, score) in result.wiscar.axes() {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(score),
            Cell::new(ScoreBand::for_score(score, 100).label()),
        ]);
    }
    table.add_row(vec![
        Cell::new("Overall"),
        Cell::new(result.overall_score),
        Cell::new(ScoreBand::for_score(result.overall_score, 100).label()),
    ]);

    writeln!(out)?;
    writeln!(out, "{} Assessment", report.bank.subject)?;
    writeln!(
        out,
        "Recommendation: {} ({}), confidence {}%",
        result.recommendation,
        result.recommendation.headline(),
        result.confidence
    )?;
    writeln!(out, "{table}")?;

    if !result.next_steps.is_empty() {
        writeln!(out, "\nNext steps:")?;
        for step in &result.next_steps {
            writeln!(out, "  - {step}")?;
        }
    }
    Ok(())
}

/// Write the report in every requested format under `output`.
pub fn export_report(
    report: &AssessmentReport,
    formats: &[ExportFormat],
    output: &Path,
    radar: &RadarConfig,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {}", output.display()))?;

    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    let short_id: String = report.id.to_string().chars().take(8).collect();
    let stem = format!("{}-{timestamp}-{short_id}", report.bank.id);

    let mut written = Vec::new();
    for format in formats {
        let path = output.join(format.file_name(&stem));
        match format {
            ExportFormat::Json => report.save_json(&path)?,
            ExportFormat::Html => write_html_report(report, radar, &path)?,
            ExportFormat::Svg => {
                let chart = layout(&report.result.wiscar.radar_axes(), radar)?;
                std::fs::write(&path, render_radar(&chart, &RadarStyle::default()))
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            ExportFormat::Markdown => std::fs::write(&path, report.to_markdown())
                .with_context(|| format!("failed to write {}", path.display()))?,
        }
        tracing::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
