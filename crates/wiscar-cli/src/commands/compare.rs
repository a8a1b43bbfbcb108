//! The `wiscar compare` command.

use std::path::PathBuf;

use anyhow::Result;

use wiscar_core::report::AssessmentReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_decline: bool,
    format: String,
) -> Result<()> {
    let baseline = AssessmentReport::load_json(&baseline_path)?;
    let current = AssessmentReport::load_json(&current_path)?;

    let comparison = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", comparison.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: overall {} -> {} ({:+}), {} improved, {} declined",
                comparison.overall.baseline,
                comparison.overall.current,
                comparison.overall.delta,
                comparison.improved().count(),
                comparison.declined().count()
            );

            if comparison.recommendation_changed() {
                println!(
                    "Recommendation: {} -> {}",
                    comparison.baseline_recommendation, comparison.current_recommendation
                );
            }
            if !comparison.same_bank {
                println!("Note: the attempts used different question banks.");
            }

            println!();
            for axis in &comparison.axes {
                println!(
                    "  {:<11} {:>3} -> {:>3} ({:+})",
                    axis.label, axis.baseline, axis.current, axis.delta
                );
            }
        }
    }

    if fail_on_decline && comparison.overall.delta < 0 {
        std::process::exit(1);
    }

    Ok(())
}
