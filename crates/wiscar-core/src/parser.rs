//! TOML question-bank parser.
//!
//! Loads question banks from TOML files and directories, validates their
//! shape, and reads JSON answer files against a bank.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    AnswerRecord, AnswerValue, Guidance, Phase, QuestionBank, QuestionDefinition, QuestionKind,
    ScaleLabels,
};

/// Intermediate TOML structure for parsing question-bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    phases: Vec<TomlPhase>,
    #[serde(default)]
    guidance: Guidance,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    subject: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlPhase {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    prompt: String,
    kind: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct: Option<String>,
    #[serde(default = "default_scale_min")]
    min: i64,
    #[serde(default = "default_scale_max")]
    max: i64,
    #[serde(default)]
    min_label: Option<String>,
    #[serde(default)]
    max_label: Option<String>,
}

fn default_scale_min() -> i64 {
    1
}

fn default_scale_max() -> i64 {
    5
}

impl TomlQuestion {
    fn into_question(self, phase_id: &str) -> Result<QuestionDefinition> {
        let kind = match self.kind.as_str() {
            "choice" | "multiple-choice" => QuestionKind::Choice {
                options: self.options,
                correct: self.correct,
            },
            "scale" => QuestionKind::Scale {
                min: self.min,
                max: self.max,
                labels: match (self.min_label, self.max_label) {
                    (Some(min), Some(max)) => Some(ScaleLabels { min, max }),
                    (None, None) => None,
                    _ => anyhow::bail!(
                        "question '{}' in phase '{phase_id}': scale labels need both min_label and max_label",
                        self.id
                    ),
                },
            },
            "free-text" | "text" => QuestionKind::FreeText,
            other => anyhow::bail!(
                "question '{}' in phase '{phase_id}': unknown question kind '{other}'",
                self.id
            ),
        };
        Ok(QuestionDefinition {
            id: self.id,
            prompt: self.prompt,
            kind,
        })
    }
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
///
/// Fails if the bank has any error-level validation issue.
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let phases = parsed
        .phases
        .into_iter()
        .map(|p| {
            let questions = p
                .questions
                .into_iter()
                .map(|q| q.into_question(&p.id))
                .collect::<Result<Vec<_>>>()?;
            Ok(Phase {
                id: p.id,
                title: p.title,
                description: p.description,
                questions,
            })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid question bank: {}", source_path.display()))?;

    let bank = QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        subject: parsed.bank.subject,
        description: parsed.bank.description,
        phases,
        guidance: parsed.guidance,
    };

    let errors: Vec<String> = validate_question_bank(&bank)
        .into_iter()
        .filter(|i| i.is_error())
        .map(|i| i.to_string())
        .collect();
    if !errors.is_empty() {
        anyhow::bail!(
            "invalid question bank {}: {}",
            source_path.display(),
            errors.join("; ")
        );
    }

    Ok(bank)
}

/// Recursively load all `.toml` question banks from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A problem found while validating a question bank.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// The phase ID (if applicable).
    pub phase_id: Option<String>,
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Validate a question bank's shape.
///
/// Errors: no phases, duplicate or empty ids, inverted scale bounds, empty,
/// blank or duplicate choice options, a keyed answer that is not an option.
/// Warnings: empty prompts, a bank with no questions at all.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut push = |severity, phase: Option<&str>, question: Option<&str>, message: String| {
        issues.push(ValidationIssue {
            severity,
            phase_id: phase.map(String::from),
            question_id: question.map(String::from),
            message,
        })
    };

    if bank.phases.is_empty() {
        push(Severity::Error, None, None, "bank has no phases".into());
    }

    let mut seen_phases = HashSet::new();
    for phase in &bank.phases {
        let pid = Some(phase.id.as_str());
        if phase.id.trim().is_empty() {
            push(Severity::Error, pid, None, "phase id is empty".into());
        }
        if !seen_phases.insert(&phase.id) {
            push(
                Severity::Error,
                pid,
                None,
                format!("duplicate phase id '{}'", phase.id),
            );
        }

        let mut seen_questions = HashSet::new();
        for q in &phase.questions {
            let qid = Some(q.id.as_str());
            if q.id.trim().is_empty() {
                push(
                    Severity::Error,
                    pid,
                    qid,
                    format!("question with empty id in phase '{}'", phase.id),
                );
            }
            if !seen_questions.insert(&q.id) {
                push(
                    Severity::Error,
                    pid,
                    qid,
                    format!("duplicate question id '{}' in phase '{}'", q.id, phase.id),
                );
            }
            if q.prompt.trim().is_empty() {
                push(
                    Severity::Warning,
                    pid,
                    qid,
                    format!("question '{}' has an empty prompt", q.id),
                );
            }

            match &q.kind {
                QuestionKind::Scale { min, max, .. } => {
                    if min > max {
                        push(
                            Severity::Error,
                            pid,
                            qid,
                            format!("question '{}' has inverted scale bounds {min}..{max}", q.id),
                        );
                    }
                }
                QuestionKind::Choice { options, correct } => {
                    if options.is_empty() {
                        push(
                            Severity::Error,
                            pid,
                            qid,
                            format!("choice question '{}' has no options", q.id),
                        );
                    }
                    if options.iter().any(|o| o.trim().is_empty()) {
                        push(
                            Severity::Error,
                            pid,
                            qid,
                            format!("choice question '{}' has a blank option", q.id),
                        );
                    }
                    let mut seen_options = HashSet::new();
                    for option in options {
                        if !seen_options.insert(option) {
                            push(
                                Severity::Error,
                                pid,
                                qid,
                                format!("question '{}' repeats option '{option}'", q.id),
                            );
                        }
                    }
                    if let Some(key) = correct {
                        if !options.contains(key) {
                            push(
                                Severity::Error,
                                pid,
                                qid,
                                format!("question '{}' keys '{key}', which is not an option", q.id),
                            );
                        }
                    }
                }
                QuestionKind::FreeText => {}
            }
        }
    }

    if !bank.phases.is_empty() && bank.total_questions() == 0 {
        push(
            Severity::Warning,
            None,
            None,
            "bank has no questions; sessions complete immediately".into(),
        );
    }

    issues
}

/// Parse a JSON answers file against a bank.
///
/// The file maps phase ids to objects of question id → answer, where an
/// answer is a number or a string. Returns one record per bank phase, in
/// bank order. Values are interpreted by question kind but not range-checked;
/// recording them into a session does that.
pub fn parse_answers_str(content: &str, bank: &QuestionBank) -> Result<Vec<AnswerRecord>> {
    let raw: BTreeMap<String, BTreeMap<String, serde_json::Value>> =
        serde_json::from_str(content).context("failed to parse answers JSON")?;

    let mut records = vec![AnswerRecord::new(); bank.phases.len()];
    for (phase_id, answers) in raw {
        let index = bank
            .phase_index(&phase_id)
            .with_context(|| format!("answers reference unknown phase '{phase_id}'"))?;
        let phase = &bank.phases[index];
        for (question_id, value) in answers {
            let question = phase.question(&question_id).with_context(|| {
                format!("answers reference unknown question '{question_id}' in phase '{phase_id}'")
            })?;
            let input = match &value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                other => anyhow::bail!(
                    "answer for '{question_id}' must be a number or string, got {other}"
                ),
            };
            let answer: AnswerValue = question.parse_input(&input)?;
            records[index].insert(question_id, answer);
        }
    }
    Ok(records)
}

/// Load a JSON answers file against a bank.
pub fn load_answers(path: &Path, bank: &QuestionBank) -> Result<Vec<AnswerRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    parse_answers_str(&content, bank)
        .with_context(|| format!("invalid answers file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "motion"
name = "Motion Graphics Readiness"
subject = "Motion Graphics Design"
description = "Should you learn motion graphics?"

[[phases]]
id = "introduction"
title = "Introduction"

[[phases]]
id = "psychometric"
title = "Psychological Assessment"
description = "Understanding your personality fit and motivation"

[[phases.questions]]
id = "interest-1"
prompt = "How often do you experiment with animation software?"
kind = "scale"
min_label = "Never"
max_label = "Very Often"

[[phases.questions]]
id = "cognitive-1"
prompt = "When solving problems, I typically prefer:"
kind = "choice"
options = ["Visual approaches", "Verbal approaches"]

[[phases]]
id = "technical"
title = "Technical Evaluation"

[[phases.questions]]
id = "tech-5"
prompt = "What frame rate is typical for professional video?"
kind = "choice"
options = ["12 fps", "24 fps"]
correct = "24 fps"

[[phases.questions]]
id = "notes"
prompt = "Anything else?"
kind = "free-text"

[[phases]]
id = "results"
title = "Results"

[guidance]
strengths = ["High visual creativity"]
career_roles = ["Motion Graphics Designer"]

[guidance.learning_path]
foundation = ["Design principles"]
"#;

    fn parse(toml: &str) -> Result<QuestionBank> {
        parse_question_bank_str(toml, &PathBuf::from("test.toml"))
    }

    #[test]
    fn parse_valid_toml() {
        let bank = parse(VALID_TOML).unwrap();
        assert_eq!(bank.id, "motion");
        assert_eq!(bank.subject, "Motion Graphics Design");
        assert_eq!(bank.phases.len(), 4);
        assert!(bank.phases[0].is_bookend());
        assert_eq!(bank.total_questions(), 4);
        assert_eq!(bank.first_content_phase(), Some(1));
        assert_eq!(bank.last_content_phase(), Some(2));

        let interest = &bank.phases[1].questions[0];
        assert_eq!(
            interest.kind,
            QuestionKind::Scale {
                min: 1,
                max: 5,
                labels: Some(ScaleLabels {
                    min: "Never".into(),
                    max: "Very Often".into()
                }),
            }
        );
        assert!(matches!(
            &bank.phases[2].questions[0].kind,
            QuestionKind::Choice { correct: Some(c), .. } if c == "24 fps"
        ));
        assert_eq!(bank.phases[2].questions[1].kind, QuestionKind::FreeText);
        assert_eq!(bank.guidance.strengths, vec!["High visual creativity"]);
        assert_eq!(
            bank.guidance.learning_path.foundation,
            vec!["Design principles"]
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let toml = r#"
[bank]
id = "b"
name = "B"
subject = "S"

[[phases]]
id = "p"
title = "P"

[[phases.questions]]
id = "q"
prompt = "?"
kind = "slider"
"#;
        let err = parse(toml).unwrap_err();
        assert!(format!("{err:#}").contains("unknown question kind 'slider'"));
    }

    #[test]
    fn inverted_bounds_fail_parsing() {
        let toml = r#"
[bank]
id = "b"
name = "B"
subject = "S"

[[phases]]
id = "p"
title = "P"

[[phases.questions]]
id = "q"
prompt = "?"
kind = "scale"
min = 5
max = 1
"#;
        let err = parse(toml).unwrap_err();
        assert!(err.to_string().contains("inverted scale bounds"));
    }

    #[test]
    fn validate_reports_shape_errors() {
        let mut bank = parse(VALID_TOML).unwrap();
        let duplicate = bank.phases[1].questions[0].clone();
        bank.phases[1].questions.push(duplicate);
        bank.phases[2].questions[0].kind = QuestionKind::Choice {
            options: vec![],
            correct: Some("24 fps".into()),
        };
        bank.phases.push(bank.phases[0].clone());

        let issues = validate_question_bank(&bank);
        let messages: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate question id 'interest-1'")));
        assert!(messages.iter().any(|m| m.contains("has no options")));
        assert!(messages.iter().any(|m| m.contains("not an option")));
        assert!(messages.iter().any(|m| m.contains("duplicate phase id")));
        assert!(issues.iter().all(|i| i.is_error()));
    }

    #[test]
    fn empty_prompt_is_only_a_warning() {
        let mut bank = parse(VALID_TOML).unwrap();
        bank.phases[1].questions[0].prompt = "  ".into();
        let issues = validate_question_bank(&bank);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].question_id.as_deref(), Some("interest-1"));
    }

    #[test]
    fn same_question_id_in_different_phases_is_fine() {
        let mut bank = parse(VALID_TOML).unwrap();
        bank.phases[2].questions[1].id = "interest-1".into();
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse(bad).is_err());
    }

    #[test]
    fn answers_are_typed_by_question_kind() {
        let bank = parse(VALID_TOML).unwrap();
        let json = r#"{
            "psychometric": { "interest-1": 4, "cognitive-1": 2 },
            "technical": { "tech-5": "24 fps", "notes": "loves After Effects" }
        }"#;
        let records = parse_answers_str(json, &bank).unwrap();
        assert_eq!(records.len(), 4);
        assert!(records[0].is_empty());
        assert_eq!(records[1]["interest-1"], AnswerValue::Scale(4));
        assert_eq!(
            records[1]["cognitive-1"],
            AnswerValue::Choice("Verbal approaches".into())
        );
        assert_eq!(records[2]["tech-5"], AnswerValue::Choice("24 fps".into()));
        assert_eq!(
            records[2]["notes"],
            AnswerValue::FreeText("loves After Effects".into())
        );
    }

    #[test]
    fn answers_for_unknown_questions_fail() {
        let bank = parse(VALID_TOML).unwrap();
        let err = parse_answers_str(r#"{ "technical": { "tech-9": 1 } }"#, &bank).unwrap_err();
        assert!(err.to_string().contains("unknown question 'tech-9'"));
        let err = parse_answers_str(r#"{ "nope": {} }"#, &bank).unwrap_err();
        assert!(err.to_string().contains("unknown phase 'nope'"));
        let err =
            parse_answers_str(r#"{ "psychometric": { "interest-1": true } }"#, &bank).unwrap_err();
        assert!(err.to_string().contains("number or string"));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("motion.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "nope = [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].id, "motion");
    }
}
