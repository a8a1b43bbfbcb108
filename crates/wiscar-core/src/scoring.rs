//! Default WISCAR scoring policy.
//!
//! Each answer is mapped onto a five-point scale, each scored phase is
//! averaged over its question count, and the averages are stretched to 0–100.
//! Axis scores derive from the psychometric mean (P) and the technical mean
//! (T); advisory lists come from the bank's guidance.

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, QuestionDefinition, QuestionKind};
use crate::results::{AssessmentResult, Recommendation, WiscarScores};
use crate::traits::{AnswerSheet, Scorer};

/// Points on the five-point scale every answer is mapped onto.
pub const POINT_SCALE: f64 = 5.0;

/// Tunable knobs of the default scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Phase whose answers drive will, interest, cognitive and ability.
    pub psychometric_phase: String,
    /// Phase whose answers drive skill.
    pub technical_phase: String,
    /// Points for answers that carry no numeric signal (unkeyed choices, free text).
    pub neutral_points: f64,
    /// Points for a keyed choice answered correctly.
    pub correct_points: f64,
    /// Points for a keyed choice answered incorrectly.
    pub incorrect_points: f64,
    /// When false, keyed choices score `neutral_points` like any other choice.
    pub grade_keyed_choices: bool,
    /// Overall score at or above which the recommendation is YES.
    pub yes_threshold: u8,
    /// Overall score below which the recommendation is NO.
    pub no_threshold: u8,
    /// Added to the overall score to get the confidence.
    pub confidence_margin: u8,
    pub min_confidence: u8,
    pub max_confidence: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            psychometric_phase: "psychometric".to_string(),
            technical_phase: "technical".to_string(),
            neutral_points: 3.0,
            correct_points: 5.0,
            incorrect_points: 1.0,
            grade_keyed_choices: true,
            yes_threshold: 80,
            no_threshold: 50,
            confidence_margin: 10,
            min_confidence: 65,
            max_confidence: 95,
        }
    }
}

impl ScoringPolicy {
    /// Map a single answer onto the five-point scale.
    pub fn answer_points(&self, question: &QuestionDefinition, answer: &AnswerValue) -> f64 {
        match (&question.kind, answer) {
            (QuestionKind::Scale { max, .. }, AnswerValue::Scale(v)) if *max > 0 => {
                (*v as f64 * POINT_SCALE / *max as f64).clamp(0.0, POINT_SCALE)
            }
            (
                QuestionKind::Choice {
                    correct: Some(key), ..
                },
                AnswerValue::Choice(choice),
            ) if self.grade_keyed_choices => {
                if choice == key {
                    self.correct_points
                } else {
                    self.incorrect_points
                }
            }
            _ => self.neutral_points,
        }
    }

    /// Mean points for a phase, averaged over all of its questions.
    ///
    /// Unanswered questions contribute nothing but still count towards the
    /// denominator. A missing or empty phase scores zero.
    pub fn phase_mean(&self, sheet: &AnswerSheet<'_>, phase_id: &str) -> f64 {
        let Some((phase, record)) = sheet.phase(phase_id) else {
            tracing::warn!("scoring phase '{phase_id}' not found in bank '{}'", sheet.bank().id);
            return 0.0;
        };
        if phase.questions.is_empty() {
            return 0.0;
        }
        let total: f64 = phase
            .questions
            .iter()
            .filter_map(|q| record.get(&q.id).map(|a| self.answer_points(q, a)))
            .sum();
        total / phase.questions.len() as f64
    }

    fn recommendation(&self, overall: u8) -> Recommendation {
        if overall >= self.yes_threshold {
            Recommendation::Yes
        } else if overall < self.no_threshold {
            Recommendation::No
        } else {
            Recommendation::Maybe
        }
    }

    fn confidence(&self, overall: u8) -> u8 {
        let raw = i64::from(overall) + i64::from(self.confidence_margin);
        raw.clamp(i64::from(self.min_confidence), i64::from(self.max_confidence)) as u8
    }
}

/// Stretch a five-point mean to a 0–100 score (not yet clamped).
fn to_percent(points: f64) -> i64 {
    (points * (100.0 / POINT_SCALE)).round() as i64
}

fn clamp_score(score: i64) -> u8 {
    score.clamp(0, 100) as u8
}

/// The default scorer.
#[derive(Debug, Clone, Default)]
pub struct WiscarScorer {
    policy: ScoringPolicy,
}

impl WiscarScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }
}

impl Scorer for WiscarScorer {
    fn score(&self, sheet: &AnswerSheet<'_>) -> AssessmentResult {
        let policy = &self.policy;
        let psych = policy.phase_mean(sheet, &policy.psychometric_phase);
        let tech = policy.phase_mean(sheet, &policy.technical_phase);

        let p = to_percent(psych);
        let t = to_percent(tech);
        let overall = clamp_score(to_percent((psych + tech) / 2.0));

        tracing::debug!(psych, tech, overall, "scored answer sheet");

        let guidance = &sheet.bank().guidance;
        AssessmentResult {
            overall_score: overall,
            recommendation: policy.recommendation(overall),
            confidence: policy.confidence(overall),
            wiscar: WiscarScores {
                will: clamp_score(p),
                interest: clamp_score(p + 5),
                skill: clamp_score(t),
                cognitive: clamp_score(p - 5),
                ability: clamp_score(p),
                real_world: overall,
            },
            strengths: guidance.strengths.clone(),
            growth_areas: guidance.growth_areas.clone(),
            next_steps: guidance.next_steps.clone(),
            alternative_paths: guidance.alternative_paths.clone(),
            career_roles: guidance.career_roles.clone(),
            learning_path: guidance.learning_path.clone(),
        }
    }
}
