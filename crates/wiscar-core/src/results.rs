//! Assessment result types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::LearningPath;
use crate::radar::RadarAxis;

/// The final outcome of a completed assessment.
///
/// Built once from a completed session and never mutated afterwards; a retake
/// produces a new, independent result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Composite readiness score, 0–100.
    pub overall_score: u8,
    pub recommendation: Recommendation,
    /// How sure the recommendation is, 0–100.
    pub confidence: u8,
    /// The six psychometric axes.
    pub wiscar: WiscarScores,
    pub strengths: Vec<String>,
    pub growth_areas: Vec<String>,
    pub next_steps: Vec<String>,
    pub alternative_paths: Vec<String>,
    pub career_roles: Vec<String>,
    pub learning_path: LearningPath,
}

/// Should the user pursue the subject?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Yes,
    Maybe,
    No,
}

impl Recommendation {
    /// Headline shown with the recommendation.
    pub fn headline(&self) -> &'static str {
        match self {
            Recommendation::Yes => "Highly Recommended",
            Recommendation::Maybe => "Proceed with Caution",
            Recommendation::No => "Consider Alternatives",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Yes => write!(f, "YES"),
            Recommendation::Maybe => write!(f, "MAYBE"),
            Recommendation::No => write!(f, "NO"),
        }
    }
}

impl FromStr for Recommendation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "YES" => Ok(Recommendation::Yes),
            "MAYBE" => Ok(Recommendation::Maybe),
            "NO" => Ok(Recommendation::No),
            other => Err(format!("unknown recommendation: {other}")),
        }
    }
}

/// Scores on the six WISCAR axes, each 0–100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiscarScores {
    pub will: u8,
    pub interest: u8,
    pub skill: u8,
    pub cognitive: u8,
    pub ability: u8,
    pub real_world: u8,
}

impl WiscarScores {
    /// Axis labels in radar order.
    pub const LABELS: [&'static str; 6] =
        ["Will", "Interest", "Skill", "Cognitive", "Ability", "Real-World"];

    /// `(label, score)` pairs in radar order.
    pub fn axes(&self) -> [(&'static str, u8); 6] {
        [
            (Self::LABELS[0], self.will),
            (Self::LABELS[1], self.interest),
            (Self::LABELS[2], self.skill),
            (Self::LABELS[3], self.cognitive),
            (Self::LABELS[4], self.ability),
            (Self::LABELS[5], self.real_world),
        ]
    }

    /// Radar input with the default max value of 100.
    pub fn radar_axes(&self) -> Vec<RadarAxis> {
        self.axes()
            .iter()
            .map(|(label, score)| RadarAxis::new(*label, f64::from(*score)))
            .collect()
    }
}

/// Display band for a 0–100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Developing,
    Low,
}

impl ScoreBand {
    pub fn for_score(score: u8, max: u8) -> Self {
        let pct = if max == 0 {
            0.0
        } else {
            f64::from(score) / f64::from(max) * 100.0
        };
        if pct >= 80.0 {
            ScoreBand::Strong
        } else if pct >= 60.0 {
            ScoreBand::Moderate
        } else if pct >= 40.0 {
            ScoreBand::Developing
        } else {
            ScoreBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "strong",
            ScoreBand::Moderate => "moderate",
            ScoreBand::Developing => "developing",
            ScoreBand::Low => "low",
        }
    }
}
