//! Assessment report types with JSON persistence and retake comparison.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::AnswerRecord;
use crate::results::{AssessmentResult, Recommendation, ScoreBand};
use crate::traits::AnswerSheet;

/// A complete assessment report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the question bank.
    pub bank: BankSummary,
    /// The scored outcome.
    pub result: AssessmentResult,
    /// Submitted answers keyed by phase id. Bookend phases are omitted.
    pub answers: BTreeMap<String, AnswerRecord>,
}

/// Summary of a question bank (without the questions themselves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub question_count: usize,
}

impl AssessmentReport {
    /// Build a report from a scored answer sheet.
    pub fn new(sheet: &AnswerSheet<'_>, result: AssessmentResult) -> Self {
        let bank = sheet.bank();
        let answers = sheet
            .phases()
            .filter(|(phase, _)| !phase.is_bookend())
            .map(|(phase, record)| (phase.id.clone(), record.clone()))
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bank: BankSummary {
                id: bank.id.clone(),
                name: bank.name.clone(),
                subject: bank.subject.clone(),
                question_count: bank.total_questions(),
            },
            result,
            answers,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let result = &self.result;
        let mut md = String::new();

        md.push_str(&format!("# {} Assessment\n\n", self.bank.subject));
        md.push_str(&format!(
            "**Recommendation:** {} ({})\n\n",
            result.recommendation,
            result.recommendation.headline()
        ));
        md.push_str(&format!(
            "**Overall score:** {}/100 | **Confidence:** {}%\n\n",
            result.overall_score, result.confidence
        ));

        md.push_str("## WISCAR Scores\n\n");
        md.push_str("| Dimension | Score | Band |\n");
        md.push_str("|-----------|-------|------|\n");
        for (label, score) in result.wiscar.axes() {
            md.push_str(&format!(
                "| {label} | {score} | {} |\n",
                ScoreBand::for_score(score, 100).label()
            ));
        }
        md.push('\n');

        let sections: [(&str, &[String]); 5] = [
            ("Strengths", &result.strengths),
            ("Growth Areas", &result.growth_areas),
            ("Next Steps", &result.next_steps),
            ("Career Roles", &result.career_roles),
            ("Alternative Paths", &result.alternative_paths),
        ];
        for (title, items) in sections {
            push_list(&mut md, title, items);
        }

        let path = &result.learning_path;
        if !(path.foundation.is_empty() && path.intermediate.is_empty() && path.advanced.is_empty())
        {
            md.push_str("## Learning Path\n\n");
            for (tier, items) in [
                ("Foundation", &path.foundation),
                ("Intermediate", &path.intermediate),
                ("Advanced", &path.advanced),
            ] {
                if !items.is_empty() {
                    md.push_str(&format!("- **{tier}:** {}\n", items.join(", ")));
                }
            }
            md.push('\n');
        }

        md.push_str(&format!(
            "_Report {} generated {}_\n",
            self.id,
            self.created_at.format("%Y-%m-%d %H:%M UTC")
        ));
        md
    }

    /// Compare this report against an earlier attempt.
    pub fn compare(&self, baseline: &AssessmentReport) -> RetakeComparison {
        if baseline.bank.id != self.bank.id {
            tracing::warn!(
                "comparing reports from different banks: '{}' vs '{}'",
                baseline.bank.id,
                self.bank.id
            );
        }

        let axes = baseline
            .result
            .wiscar
            .axes()
            .iter()
            .zip(self.result.wiscar.axes().iter())
            .map(|((label, before), (_, after))| ScoreDelta::new(label, *before, *after))
            .collect();

        RetakeComparison {
            baseline_id: baseline.id,
            current_id: self.id,
            same_bank: baseline.bank.id == self.bank.id,
            overall: ScoreDelta::new(
                "Overall",
                baseline.result.overall_score,
                self.result.overall_score,
            ),
            axes,
            baseline_recommendation: baseline.result.recommendation,
            current_recommendation: self.result.recommendation,
        }
    }
}

fn push_list(md: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    md.push_str(&format!("## {title}\n\n"));
    for item in items {
        md.push_str(&format!("- {item}\n"));
    }
    md.push('\n');
}

/// Change in one score between two attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub label: String,
    pub baseline: u8,
    pub current: u8,
    pub delta: i16,
}

impl ScoreDelta {
    fn new(label: &str, baseline: u8, current: u8) -> Self {
        Self {
            label: label.to_string(),
            baseline,
            current,
            delta: i16::from(current) - i16::from(baseline),
        }
    }
}

/// Result of comparing a retake against an earlier attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetakeComparison {
    pub baseline_id: Uuid,
    pub current_id: Uuid,
    /// Whether both attempts used the same question bank.
    pub same_bank: bool,
    pub overall: ScoreDelta,
    /// One entry per WISCAR axis, in radar order.
    pub axes: Vec<ScoreDelta>,
    pub baseline_recommendation: Recommendation,
    pub current_recommendation: Recommendation,
}

impl RetakeComparison {
    pub fn recommendation_changed(&self) -> bool {
        self.baseline_recommendation != self.current_recommendation
    }

    /// Axes whose score went up.
    pub fn improved(&self) -> impl Iterator<Item = &ScoreDelta> {
        self.axes.iter().filter(|a| a.delta > 0)
    }

    /// Axes whose score went down.
    pub fn declined(&self) -> impl Iterator<Item = &ScoreDelta> {
        self.axes.iter().filter(|a| a.delta < 0)
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** overall {} → {} ({:+}), {} improved, {} declined\n\n",
            self.overall.baseline,
            self.overall.current,
            self.overall.delta,
            self.improved().count(),
            self.declined().count()
        ));

        if self.recommendation_changed() {
            md.push_str(&format!(
                "**Recommendation changed:** {} → {}\n\n",
                self.baseline_recommendation, self.current_recommendation
            ));
        }
        if !self.same_bank {
            md.push_str("> Attempts used different question banks.\n\n");
        }

        md.push_str("| Dimension | Baseline | Current | Delta |\n");
        md.push_str("|-----------|----------|---------|-------|\n");
        for a in self.axes.iter().chain(std::iter::once(&self.overall)) {
            md.push_str(&format!(
                "| {} | {} | {} | {:+} |\n",
                a.label, a.baseline, a.current, a.delta
            ));
        }

        md
    }
}
