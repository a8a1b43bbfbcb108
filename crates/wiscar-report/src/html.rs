//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS and the radar chart inlined.

use anyhow::{Context, Result};
use std::path::Path;

use wiscar_core::radar::{layout, RadarConfig};
use wiscar_core::report::AssessmentReport;
use wiscar_core::results::{Recommendation, ScoreBand};

use crate::svg::{render_radar, RadarStyle};

/// Escape a string for safe HTML insertion.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from an assessment report.
pub fn generate_html(report: &AssessmentReport, radar: &RadarConfig) -> Result<String> {
    let result = &report.result;
    let chart = layout(&result.wiscar.radar_axes(), radar).context("failed to lay out radar chart")?;

    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{} assessment</title>\n",
        html_escape(&report.bank.subject)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{} Assessment</h1>\n",
        html_escape(&report.bank.subject)
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Bank: <strong>{}</strong> | {} questions | {}</p>\n",
        html_escape(&report.bank.name),
        report.bank.question_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"verdict\">\n");
    html.push_str(&format!(
        "<p class=\"badge {}\">{} &middot; {}</p>\n",
        recommendation_class(result.recommendation),
        result.recommendation,
        result.recommendation.headline()
    ));
    html.push_str(&format!(
        "<p class=\"overall\"><strong>{}</strong>/100 overall | {}% confidence</p>\n",
        result.overall_score, result.confidence
    ));
    html.push_str("</section>\n");

    html.push_str("<section class=\"scores\">\n");
    html.push_str("<h2>WISCAR Analysis</h2>\n");
    html.push_str(&render_radar(&chart, &RadarStyle::default()));
    html.push_str("<table class=\"bars\">\n<tbody>\n");
    for (label, score) in result.wiscar.axes() {
        let band = ScoreBand::for_score(score, 100);
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"track\"><div class=\"bar {}\" style=\"width: {}%\"></div></td><td>{}</td></tr>\n",
            label,
            band.label(),
            score,
            score
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    for (title, items) in [
        ("Strengths", &result.strengths),
        ("Growth Areas", &result.growth_areas),
        ("Next Steps", &result.next_steps),
        ("Career Roles", &result.career_roles),
        ("Alternative Paths", &result.alternative_paths),
    ] {
        push_list(&mut html, title, items);
    }

    let path = &result.learning_path;
    if !(path.foundation.is_empty() && path.intermediate.is_empty() && path.advanced.is_empty()) {
        html.push_str("<section class=\"learning-path\">\n<h2>Learning Path</h2>\n<ol>\n");
        for (tier, items) in [
            ("Foundation", &path.foundation),
            ("Intermediate", &path.intermediate),
            ("Advanced", &path.advanced),
        ] {
            if items.is_empty() {
                continue;
            }
            let escaped: Vec<String> = items.iter().map(|i| html_escape(i)).collect();
            html.push_str(&format!(
                "<li><strong>{tier}:</strong> {}</li>\n",
                escaped.join(", ")
            ));
        }
        html.push_str("</ol>\n</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).context("failed to serialize report")?,
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    Ok(html)
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &AssessmentReport, radar: &RadarConfig, path: &Path) -> Result<()> {
    let html = generate_html(report, radar)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn recommendation_class(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::Yes => "yes",
        Recommendation::Maybe => "maybe",
        Recommendation::No => "no",
    }
}

fn push_list(html: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    html.push_str(&format!("<section>\n<h2>{title}</h2>\n<ul>\n"));
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", html_escape(item)));
    }
    html.push_str("</ul>\n</section>\n");
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --yes: #dcfce7; --maybe: #fef9c3; --no: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --yes: #064e3b; --maybe: #713f12; --no: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 860px; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.badge { display: inline-block; padding: 0.4rem 1rem; border-radius: 999px; font-weight: bold; }
.badge.yes { background: var(--yes); }
.badge.maybe { background: var(--maybe); }
.badge.no { background: var(--no); }
table.bars { border-collapse: collapse; width: 100%; margin: 1rem 0; }
table.bars td { padding: 0.35rem 0.5rem; }
.track { width: 70%; background: var(--border); border-radius: 4px; }
.bar { height: 0.75rem; border-radius: 4px; }
.bar.strong { background: #22c55e; }
.bar.moderate { background: #84cc16; }
.bar.developing { background: #eab308; }
.bar.low { background: #ef4444; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg.radar { display: block; margin: 1rem auto; overflow: visible; }
"#;
