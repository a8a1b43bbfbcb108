//! The scoring seam.
//!
//! The session engine knows nothing about how answers become a result. A
//! [`Scorer`] receives a read-only [`AnswerSheet`] and returns the result;
//! any closure of the right shape is a scorer too.

use crate::model::{AnswerRecord, AnswerValue, Phase, QuestionBank};
use crate::results::AssessmentResult;

/// Turns a completed answer sheet into a result.
pub trait Scorer {
    fn score(&self, sheet: &AnswerSheet<'_>) -> AssessmentResult;
}

impl<F> Scorer for F
where
    F: Fn(&AnswerSheet<'_>) -> AssessmentResult,
{
    fn score(&self, sheet: &AnswerSheet<'_>) -> AssessmentResult {
        self(sheet)
    }
}

/// The bank together with the answers recorded for each of its phases.
#[derive(Debug, Clone, Copy)]
pub struct AnswerSheet<'a> {
    bank: &'a QuestionBank,
    answers: &'a [AnswerRecord],
}

impl<'a> AnswerSheet<'a> {
    /// `answers` holds one record per phase of `bank`, in the same order.
    pub fn new(bank: &'a QuestionBank, answers: &'a [AnswerRecord]) -> Self {
        debug_assert_eq!(bank.phases.len(), answers.len());
        Self { bank, answers }
    }

    pub fn bank(&self) -> &'a QuestionBank {
        self.bank
    }

    /// Phases paired with their answers, in bank order.
    pub fn phases(&self) -> impl Iterator<Item = (&'a Phase, &'a AnswerRecord)> + 'a {
        self.bank.phases.iter().zip(self.answers.iter())
    }

    /// The phase with the given id and its answers.
    pub fn phase(&self, phase_id: &str) -> Option<(&'a Phase, &'a AnswerRecord)> {
        let index = self.bank.phase_index(phase_id)?;
        Some((&self.bank.phases[index], self.answers.get(index)?))
    }

    /// A single answer.
    pub fn answer(&self, phase_id: &str, question_id: &str) -> Option<&'a AnswerValue> {
        self.phase(phase_id)
            .and_then(|(_, record)| record.get(question_id))
    }

    /// Number of answers across all phases.
    pub fn answered_count(&self) -> usize {
        self.answers.iter().map(|r| r.len()).sum()
    }
}
