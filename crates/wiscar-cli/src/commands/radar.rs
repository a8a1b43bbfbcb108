//! The `wiscar radar` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use wiscar_core::radar::{layout, RadarAxis};
use wiscar_report::svg::{render_radar, RadarStyle};

use crate::config::load_config_from;

pub fn execute(
    values: String,
    size: Option<f64>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let mut radar = config.radar;
    if let Some(size) = size {
        radar = radar.with_size(size);
    }

    let axes = parse_values(&values)?;
    let chart = layout(&axes, &radar)?;

    let rendered = match format.as_str() {
        "svg" => render_radar(&chart, &RadarStyle::default()),
        "json" => serde_json::to_string_pretty(&chart)?,
        other => anyhow::bail!("unknown radar format '{other}' (expected svg or json)"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Radar chart: {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Parse `Label=value` or `Label=value/max` pairs separated by commas.
fn parse_values(s: &str) -> Result<Vec<RadarAxis>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| -> Result<RadarAxis> {
            let (label, raw) = part
                .split_once('=')
                .with_context(|| format!("expected LABEL=VALUE, got '{part}'"))?;
            let (value, max) = match raw.split_once('/') {
                Some((value, max)) => (value, Some(max)),
                None => (raw, None),
            };
            let value: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("invalid value for '{}': '{value}'", label.trim()))?;
            let axis = RadarAxis::new(label.trim(), value);
            match max {
                Some(max) => {
                    let max: f64 = max
                        .trim()
                        .parse()
                        .with_context(|| format!("invalid max for '{}': '{max}'", label.trim()))?;
                    Ok(axis.with_max(max))
                }
                None => Ok(axis),
            }
        })
        .collect()
}
