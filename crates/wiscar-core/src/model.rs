//! Core data model types for wiscar.
//!
//! Question banks are static configuration: an ordered list of phases, each an
//! ordered list of questions, plus the advisory guidance copied into results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

/// Answers for one phase, keyed by question id.
pub type AnswerRecord = BTreeMap<String, AnswerValue>;

/// A complete question bank for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// The skill or career being assessed (e.g. "Motion Graphics Design").
    pub subject: String,
    /// Description of this bank.
    #[serde(default)]
    pub description: String,
    /// Phases in presentation order.
    pub phases: Vec<Phase>,
    /// Advisory content copied into every result.
    #[serde(default)]
    pub guidance: Guidance,
}

impl QuestionBank {
    /// Look up a phase by id.
    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Index of the phase with the given id.
    pub fn phase_index(&self, id: &str) -> Option<usize> {
        self.phases.iter().position(|p| p.id == id)
    }

    /// Index of the first phase that has questions.
    pub fn first_content_phase(&self) -> Option<usize> {
        self.phases.iter().position(|p| !p.is_bookend())
    }

    /// Index of the last phase that has questions.
    pub fn last_content_phase(&self) -> Option<usize> {
        self.phases.iter().rposition(|p| !p.is_bookend())
    }

    /// Total number of questions across all phases.
    pub fn total_questions(&self) -> usize {
        self.phases.iter().map(|p| p.questions.len()).sum()
    }
}

/// A named, ordered group of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    /// Unique identifier within the bank (e.g. "psychometric").
    pub id: String,
    /// Display title (e.g. "Psychological Assessment").
    pub title: String,
    /// Subtitle shown above the phase's questions.
    #[serde(default)]
    pub description: String,
    /// Questions in presentation order. Empty for bookend phases.
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
}

impl Phase {
    /// Bookend phases (introduction, results) carry no questions.
    pub fn is_bookend(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question_index(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }
}

/// A single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Unique identifier within its phase.
    pub id: String,
    /// The question text shown to the user.
    pub prompt: String,
    /// Kind and kind-specific parameters.
    pub kind: QuestionKind,
}

/// What sort of answer a question takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    /// Pick one of an ordered set of options.
    Choice {
        options: Vec<String>,
        /// The keyed answer for knowledge checks.
        #[serde(default)]
        correct: Option<String>,
    },
    /// An integer rating within inclusive bounds.
    Scale {
        min: i64,
        max: i64,
        #[serde(default)]
        labels: Option<ScaleLabels>,
    },
    /// Unconstrained text.
    FreeText,
}

impl QuestionKind {
    /// The name used in question-bank files.
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::Choice { .. } => "choice",
            QuestionKind::Scale { .. } => "scale",
            QuestionKind::FreeText => "free-text",
        }
    }
}

/// Captions for the two ends of a scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleLabels {
    pub min: String,
    pub max: String,
}

impl QuestionDefinition {
    /// Check an answer against this question's kind and parameters.
    ///
    /// Scale values outside `[min, max]` and choices that are not among the
    /// options are rejected rather than clamped.
    pub fn check_answer(&self, value: &AnswerValue) -> Result<(), AssessmentError> {
        let subject = || format!("answer for '{}'", self.id);
        match (&self.kind, value) {
            (QuestionKind::Scale { min, max, .. }, AnswerValue::Scale(v)) => {
                if v < min || v > max {
                    return Err(AssessmentError::validation(
                        subject(),
                        format!("{v} is outside {min}..={max}"),
                    ));
                }
                Ok(())
            }
            (QuestionKind::Choice { options, .. }, AnswerValue::Choice(choice)) => {
                if !options.iter().any(|o| o == choice) {
                    return Err(AssessmentError::validation(
                        subject(),
                        format!("'{choice}' is not one of the options"),
                    ));
                }
                Ok(())
            }
            (QuestionKind::FreeText, AnswerValue::FreeText(_)) => Ok(()),
            (kind, value) => Err(AssessmentError::validation(
                subject(),
                format!(
                    "expected a {} answer, got {}",
                    kind.name(),
                    value.kind_name()
                ),
            )),
        }
    }

    /// Interpret raw user input as an answer of this question's kind.
    ///
    /// Scale input must be an integer. Choice input may be the option text
    /// or its 1-based number. The result still has to pass [`check_answer`].
    ///
    /// [`check_answer`]: QuestionDefinition::check_answer
    pub fn parse_input(&self, input: &str) -> Result<AnswerValue, AssessmentError> {
        let input = input.trim();
        match &self.kind {
            QuestionKind::Scale { .. } => input.parse::<i64>().map(AnswerValue::Scale).map_err(|_| {
                AssessmentError::validation(
                    format!("answer for '{}'", self.id),
                    format!("'{input}' is not a whole number"),
                )
            }),
            QuestionKind::Choice { options, .. } => {
                if let Some(option) = options.iter().find(|o| o.as_str() == input) {
                    return Ok(AnswerValue::Choice(option.clone()));
                }
                match input.parse::<usize>() {
                    Ok(n) if (1..=options.len()).contains(&n) => {
                        Ok(AnswerValue::Choice(options[n - 1].clone()))
                    }
                    _ => Ok(AnswerValue::Choice(input.to_string())),
                }
            }
            QuestionKind::FreeText => Ok(AnswerValue::FreeText(input.to_string())),
        }
    }
}

/// A submitted answer, tagged by the kind of question it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum AnswerValue {
    Choice(String),
    Scale(i64),
    FreeText(String),
}

impl AnswerValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AnswerValue::Choice(_) => "choice",
            AnswerValue::Scale(_) => "scale",
            AnswerValue::FreeText(_) => "free-text",
        }
    }

    /// Whether this answer counts as "not answered" for navigation.
    ///
    /// Free text may legitimately be empty; a blank choice never is valid.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Choice(s) => s.trim().is_empty(),
            AnswerValue::Scale(_) | AnswerValue::FreeText(_) => false,
        }
    }

    pub fn as_scale(&self) -> Option<i64> {
        match self {
            AnswerValue::Scale(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Choice(s) | AnswerValue::FreeText(s) => write!(f, "{s}"),
            AnswerValue::Scale(v) => write!(f, "{v}"),
        }
    }
}

/// Advisory content attached to a bank and copied into its results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guidance {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub growth_areas: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub alternative_paths: Vec<String>,
    #[serde(default)]
    pub career_roles: Vec<String>,
    #[serde(default)]
    pub learning_path: LearningPath,
}

/// A three-tier learning path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    #[serde(default)]
    pub foundation: Vec<String>,
    #[serde(default)]
    pub intermediate: Vec<String>,
    #[serde(default)]
    pub advanced: Vec<String>,
}
