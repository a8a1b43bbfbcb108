//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wiscar_core::radar::RadarConfig;
use wiscar_core::scoring::ScoringPolicy;

/// Top-level wiscar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WiscarConfig {
    /// Bank used when `--bank` is not given.
    #[serde(default)]
    pub default_bank: Option<PathBuf>,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Default export format: json, html, svg, markdown, or all.
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub radar: RadarConfig,
    #[serde(default)]
    pub scoring: ScoringPolicy,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./wiscar-results")
}
fn default_format() -> String {
    "json".to_string()
}

impl Default for WiscarConfig {
    fn default() -> Self {
        Self {
            default_bank: None,
            output_dir: default_output_dir(),
            format: default_format(),
            radar: RadarConfig::default(),
            scoring: ScoringPolicy::default(),
        }
    }
}

impl WiscarConfig {
    /// The bank to load: an explicit path wins over the configured default.
    pub fn bank_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        explicit.or_else(|| self.default_bank.clone()).context(
            "no question bank given; pass --bank or set default_bank in wiscar.toml",
        )
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `wiscar.toml` in the current directory
/// 2. `~/.config/wiscar/config.toml`
///
/// `WISCAR_OUTPUT_DIR` overrides the output directory.
pub fn load_config_from(path: Option<&Path>) -> Result<WiscarConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("wiscar.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => WiscarConfig::default(),
    };
    if let Some(path) = &config_path {
        tracing::debug!("loaded config from {}", path.display());
    }

    // Apply env var overrides
    if let Ok(dir) = std::env::var("WISCAR_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    Ok(config)
}

fn parse_config(content: &str) -> Result<WiscarConfig> {
    let mut config: WiscarConfig = toml::from_str(content)?;
    config.output_dir = resolve_path(&config.output_dir);
    config.default_bank = config.default_bank.as_deref().map(resolve_path);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("wiscar"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_WISCAR_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_WISCAR_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_WISCAR_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        assert_eq!(
            resolve_env_vars("a/${_WISCAR_TEST_VAR}/b/${_WISCAR_TEST_VAR}"),
            "a/hello/b/hello"
        );
        std::env::remove_var("_WISCAR_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_reexpand_values() {
        std::env::set_var("_WISCAR_SELF_REF", "${_WISCAR_SELF_REF}");
        assert_eq!(
            resolve_env_vars("out/${_WISCAR_SELF_REF}/x"),
            "out/${_WISCAR_SELF_REF}/x"
        );
        std::env::remove_var("_WISCAR_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = WiscarConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("./wiscar-results"));
        assert_eq!(config.format, "json");
        assert_eq!(config.radar.size, 300.0);
        assert_eq!(config.scoring.yes_threshold, 80);
        assert!(config.bank_path(None).is_err());
        assert_eq!(
            config.bank_path(Some("b.toml".into())).unwrap(),
            PathBuf::from("b.toml")
        );
    }

    #[test]
    fn parse_partial_config() {
        std::env::set_var("_WISCAR_BANKS", "/srv/banks");
        let config = parse_config(
            r#"
default_bank = "${_WISCAR_BANKS}/motion-graphics.toml"
format = "all"

[radar]
size = 400.0

[scoring]
yes_threshold = 85
"#,
        )
        .unwrap();
        std::env::remove_var("_WISCAR_BANKS");

        assert_eq!(
            config.default_bank,
            Some(PathBuf::from("/srv/banks/motion-graphics.toml"))
        );
        assert_eq!(config.format, "all");
        assert_eq!(config.radar.size, 400.0);
        assert_eq!(config.radar.margin, 50.0);
        assert_eq!(config.scoring.yes_threshold, 85);
        assert_eq!(config.scoring.no_threshold, 50);
        assert_eq!(config.output_dir, PathBuf::from("./wiscar-results"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/wiscar.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
