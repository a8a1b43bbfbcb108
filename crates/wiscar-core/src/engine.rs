//! Assessment session engine.
//!
//! An [`AssessmentSession`] walks a question bank phase by phase, records
//! answers, enforces navigation rules, and hands the finished answer sheet to
//! a [`Scorer`]. Each session owns its state outright; the bank itself is
//! immutable and may be shared between any number of sessions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::model::{AnswerRecord, AnswerValue, QuestionBank, QuestionDefinition};
use crate::parser::validate_question_bank;
use crate::results::AssessmentResult;
use crate::traits::{AnswerSheet, Scorer};

/// Navigation state of a session.
///
/// Invariants: `phase_index < phases.len()`, and `question_index` is a valid
/// index into the current phase's questions whenever that phase has any
/// (zero otherwise). `answers` holds one record per phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase_index: usize,
    pub question_index: usize,
    pub answers: Vec<AnswerRecord>,
    pub completed: bool,
}

impl SessionState {
    fn initial(phase_count: usize) -> Self {
        Self {
            phase_index: 0,
            question_index: 0,
            answers: vec![AnswerRecord::new(); phase_count],
            completed: false,
        }
    }
}

/// What a navigation call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    NextQuestion,
    NextPhase,
    /// The last content phase was passed; the session is now terminal.
    Completed,
    PreviousQuestion,
    PreviousPhase,
    /// Nothing to retreat to.
    Stayed,
}

/// Where the session currently is, for question cards and headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    pub phase_index: usize,
    pub phase_id: String,
    pub phase_title: String,
    /// 1-based; zero on a bookend phase.
    pub question_number: usize,
    pub total_questions: usize,
    /// First question of the first content phase (nothing to go back to).
    pub is_first: bool,
    /// Last question of the last content phase (advancing completes).
    pub is_last: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Done,
    Current,
    Upcoming,
}

/// Progress through one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseProgress {
    pub phase_id: String,
    pub title: String,
    pub status: PhaseStatus,
    pub answered: usize,
    pub total: usize,
}

/// A single user's walk through a question bank.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    bank: Arc<QuestionBank>,
    state: SessionState,
    first_content: Option<usize>,
    last_content: Option<usize>,
}

impl AssessmentSession {
    /// Start a fresh session.
    ///
    /// Fails if the bank has no phases or does not pass the shape checks of
    /// [`validate_question_bank`].
    pub fn new(bank: Arc<QuestionBank>) -> Result<Self, AssessmentError> {
        if bank.phases.is_empty() {
            return Err(AssessmentError::validation(
                format!("question bank '{}'", bank.id),
                "at least one phase is required",
            ));
        }
        if let Some(issue) = validate_question_bank(&bank)
            .into_iter()
            .find(|i| i.is_error())
        {
            return Err(AssessmentError::validation(
                format!("question bank '{}'", bank.id),
                issue.to_string(),
            ));
        }

        let first_content = bank.first_content_phase();
        let last_content = bank.last_content_phase();
        let state = SessionState::initial(bank.phases.len());
        tracing::debug!(bank = %bank.id, phases = bank.phases.len(), "session started");

        Ok(Self {
            bank,
            state,
            first_content,
            last_content,
        })
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state.completed
    }

    /// Answers recorded for one phase.
    pub fn answers(&self, phase_index: usize) -> Option<&AnswerRecord> {
        self.state.answers.get(phase_index)
    }

    /// Read-only view of the bank and every recorded answer.
    pub fn answer_sheet(&self) -> AnswerSheet<'_> {
        AnswerSheet::new(&self.bank, &self.state.answers)
    }

    /// Store or overwrite the answer to `question_id` in the given phase.
    ///
    /// The question must exist, must already have been reached, and the value
    /// must fit its kind: out-of-range scale values and unknown choices are
    /// rejected, never clamped.
    pub fn record_answer(
        &mut self,
        phase_index: usize,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<(), AssessmentError> {
        if self.state.completed {
            return Err(AssessmentError::AlreadyComplete);
        }
        let phase = self.bank.phases.get(phase_index).ok_or_else(|| {
            AssessmentError::validation(
                "phase index",
                format!(
                    "{phase_index} is out of range for {} phases",
                    self.bank.phases.len()
                ),
            )
        })?;
        let question_index = phase.question_index(question_id).ok_or_else(|| {
            AssessmentError::validation(
                format!("question '{question_id}'"),
                format!("not part of phase '{}'", phase.id),
            )
        })?;
        if (phase_index, question_index) > (self.state.phase_index, self.state.question_index) {
            return Err(AssessmentError::validation(
                format!("answer for '{question_id}'"),
                "question has not been reached yet",
            ));
        }
        phase.questions[question_index].check_answer(&value)?;

        tracing::debug!(phase = %phase.id, question = question_id, answer = %value, "answer recorded");
        self.state.answers[phase_index].insert(question_id.to_string(), value);
        Ok(())
    }

    /// Record an answer for the question at the current position.
    pub fn answer_current(&mut self, value: AnswerValue) -> Result<(), AssessmentError> {
        if self.state.completed {
            return Err(AssessmentError::AlreadyComplete);
        }
        let question_id = self.current_question()?.id.clone();
        self.record_answer(self.state.phase_index, &question_id, value)
    }

    /// Drive the session to completion from a full set of answers, one record
    /// per phase in bank order.
    ///
    /// Every reached question must have an answer in `answers`; the first
    /// missing one stops the replay with [`AssessmentError::IncompleteAnswer`].
    pub fn replay(&mut self, answers: &[AnswerRecord]) -> Result<(), AssessmentError> {
        while !self.state.completed {
            let current = self.current_question().ok().map(|q| q.id.clone());
            if let Some(question_id) = current {
                let value = answers
                    .get(self.state.phase_index)
                    .and_then(|record| record.get(&question_id))
                    .cloned()
                    .ok_or(AssessmentError::IncompleteAnswer { question_id })?;
                self.answer_current(value)?;
            }
            self.advance()?;
        }
        Ok(())
    }

    /// The question at the current position.
    ///
    /// A completed session has no current question, even when it is parked
    /// on a phase that has questions.
    pub fn current_question(&self) -> Result<&QuestionDefinition, AssessmentError> {
        if self.state.completed {
            return Err(AssessmentError::AlreadyComplete);
        }
        let phase = &self.bank.phases[self.state.phase_index];
        phase
            .questions
            .get(self.state.question_index)
            .ok_or_else(|| AssessmentError::OutOfQuestions {
                phase: phase.id.clone(),
            })
    }

    /// Move forward exactly one step.
    ///
    /// On a content phase the current question must be answered first; on a
    /// failure nothing changes. Bookend phases are passed through freely.
    /// Leaving the last content phase completes the session and parks it on
    /// the final phase.
    pub fn advance(&mut self) -> Result<Transition, AssessmentError> {
        if self.state.completed {
            return Err(AssessmentError::AlreadyComplete);
        }

        let phase_index = self.state.phase_index;
        let phase = &self.bank.phases[phase_index];
        if !phase.is_bookend() {
            let question = &phase.questions[self.state.question_index];
            let answered = self.state.answers[phase_index]
                .get(&question.id)
                .is_some_and(|a| !a.is_blank());
            if !answered {
                return Err(AssessmentError::IncompleteAnswer {
                    question_id: question.id.clone(),
                });
            }
            if self.state.question_index + 1 < phase.questions.len() {
                self.state.question_index += 1;
                tracing::debug!(phase = %phase.id, question = self.state.question_index, "advanced");
                return Ok(Transition::NextQuestion);
            }
        }

        let finished = self.last_content.map_or(true, |last| phase_index >= last);
        if finished {
            self.state.completed = true;
            self.state.phase_index = self.bank.phases.len() - 1;
            self.state.question_index = 0;
            tracing::debug!(bank = %self.bank.id, "assessment completed");
            return Ok(Transition::Completed);
        }

        self.state.phase_index += 1;
        self.state.question_index = 0;
        tracing::debug!(phase = %self.bank.phases[self.state.phase_index].id, "entered phase");
        Ok(Transition::NextPhase)
    }

    /// Move back one step, keeping every recorded answer.
    ///
    /// Never moves before the first question of the first content phase and
    /// never leaves a completed session.
    pub fn retreat(&mut self) -> Transition {
        if self.state.completed {
            return Transition::Stayed;
        }
        if self.state.question_index > 0 {
            self.state.question_index -= 1;
            return Transition::PreviousQuestion;
        }
        match self.first_content {
            Some(first) if self.state.phase_index > first => {
                self.state.phase_index -= 1;
                let phase = &self.bank.phases[self.state.phase_index];
                self.state.question_index = phase.questions.len().saturating_sub(1);
                tracing::debug!(phase = %phase.id, "returned to phase");
                Transition::PreviousPhase
            }
            _ => Transition::Stayed,
        }
    }

    /// Score the completed session.
    pub fn compute_result<S>(&self, scorer: &S) -> Result<AssessmentResult, AssessmentError>
    where
        S: Scorer + ?Sized,
    {
        if !self.state.completed {
            return Err(AssessmentError::NotComplete);
        }
        Ok(scorer.score(&self.answer_sheet()))
    }

    /// Discard all answers and return to the initial state (a retake).
    pub fn reset(&mut self) {
        self.state = SessionState::initial(self.bank.phases.len());
        tracing::debug!(bank = %self.bank.id, "session reset");
    }

    pub fn position(&self) -> Position {
        let phase_index = self.state.phase_index;
        let phase = &self.bank.phases[phase_index];
        let total = phase.questions.len();
        let on_question = total > 0 && !self.state.completed;
        Position {
            phase_index,
            phase_id: phase.id.clone(),
            phase_title: phase.title.clone(),
            question_number: if on_question {
                self.state.question_index + 1
            } else {
                0
            },
            total_questions: total,
            is_first: on_question
                && self.first_content == Some(phase_index)
                && self.state.question_index == 0,
            is_last: on_question
                && self.last_content == Some(phase_index)
                && self.state.question_index + 1 == total,
            completed: self.state.completed,
        }
    }

    /// One entry per phase, in bank order.
    pub fn progress(&self) -> Vec<PhaseProgress> {
        self.bank
            .phases
            .iter()
            .zip(&self.state.answers)
            .enumerate()
            .map(|(i, (phase, record))| {
                let status = if self.state.completed || i < self.state.phase_index {
                    PhaseStatus::Done
                } else if i == self.state.phase_index {
                    PhaseStatus::Current
                } else {
                    PhaseStatus::Upcoming
                };
                PhaseProgress {
                    phase_id: phase.id.clone(),
                    title: phase.title.clone(),
                    status,
                    answered: record.len(),
                    total: phase.questions.len(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Guidance, LearningPath, Phase, QuestionKind};
    use crate::results::{Recommendation, WiscarScores};

    fn scale(id: &str) -> QuestionDefinition {
        QuestionDefinition {
            id: id.into(),
            prompt: format!("Rate {id}"),
            kind: QuestionKind::Scale {
                min: 1,
                max: 5,
                labels: None,
            },
        }
    }

    fn choice(id: &str) -> QuestionDefinition {
        QuestionDefinition {
            id: id.into(),
            prompt: format!("Pick {id}"),
            kind: QuestionKind::Choice {
                options: vec!["first".into(), "second".into()],
                correct: None,
            },
        }
    }

    fn phase(id: &str, questions: Vec<QuestionDefinition>) -> Phase {
        Phase {
            id: id.into(),
            title: id.to_uppercase(),
            description: String::new(),
            questions,
        }
    }

    fn bank(phases: Vec<Phase>) -> Arc<QuestionBank> {
        Arc::new(QuestionBank {
            id: "test".into(),
            name: "Test".into(),
            subject: "Testing".into(),
            description: String::new(),
            phases,
            guidance: Guidance::default(),
        })
    }

    fn two_phase() -> AssessmentSession {
        AssessmentSession::new(bank(vec![
            phase("a", vec![scale("a1")]),
            phase("b", vec![choice("b1")]),
        ]))
        .unwrap()
    }

    /// introduction → psychometric (2) → technical (2) → results
    fn five_phase() -> AssessmentSession {
        AssessmentSession::new(bank(vec![
            phase("introduction", vec![]),
            phase("psychometric", vec![scale("p1"), choice("p2")]),
            phase("technical", vec![choice("t1"), scale("t2")]),
            phase("review", vec![]),
            phase("results", vec![]),
        ]))
        .unwrap()
    }

    fn fixed_result(_: &AnswerSheet<'_>) -> AssessmentResult {
        AssessmentResult {
            overall_score: 72,
            recommendation: Recommendation::Maybe,
            confidence: 82,
            wiscar: WiscarScores {
                will: 72,
                interest: 77,
                skill: 60,
                cognitive: 67,
                ability: 72,
                real_world: 66,
            },
            strengths: vec!["Visual creativity".into()],
            growth_areas: vec![],
            next_steps: vec![],
            alternative_paths: vec![],
            career_roles: vec![],
            learning_path: LearningPath::default(),
        }
    }

    fn answer_current_validly(session: &mut AssessmentSession) {
        let question = session.current_question().unwrap().clone();
        let value = match question.kind {
            QuestionKind::Scale { min, .. } => AnswerValue::Scale(min),
            QuestionKind::Choice { options, .. } => AnswerValue::Choice(options[0].clone()),
            QuestionKind::FreeText => AnswerValue::FreeText("text".into()),
        };
        session.answer_current(value).unwrap();
    }

    fn assert_in_bounds(session: &AssessmentSession) {
        let state = session.state();
        let phases = &session.bank().phases;
        assert!(state.phase_index < phases.len());
        let count = phases[state.phase_index].questions.len();
        if count > 0 {
            assert!(state.question_index < count);
        } else {
            assert_eq!(state.question_index, 0);
        }
        assert_eq!(state.answers.len(), phases.len());
    }

    #[test]
    fn two_phase_end_to_end() {
        let mut session = two_phase();
        session
            .record_answer(0, "a1", AnswerValue::Scale(4))
            .unwrap();
        assert_eq!(session.advance().unwrap(), Transition::NextPhase);
        assert_eq!(session.state().phase_index, 1);
        assert_eq!(session.state().question_index, 0);
        assert_eq!(session.current_question().unwrap().id, "b1");

        session
            .record_answer(1, "b1", AnswerValue::Choice("first".into()))
            .unwrap();
        assert_eq!(session.advance().unwrap(), Transition::Completed);
        assert!(session.is_complete());

        // Parked on the last content phase, but nothing is left to answer.
        assert_eq!(session.state().phase_index, 1);
        assert_eq!(
            session.current_question().unwrap_err(),
            AssessmentError::AlreadyComplete
        );
        let position = session.position();
        assert!(position.completed);
        assert!(!position.is_last);
        assert_eq!(position.question_number, 0);

        let result = session.compute_result(&fixed_result).unwrap();
        assert_eq!(result, fixed_result(&session.answer_sheet()));
    }

    #[test]
    fn compute_result_requires_completion() {
        let session = two_phase();
        assert_eq!(
            session.compute_result(&fixed_result).unwrap_err(),
            AssessmentError::NotComplete
        );
    }

    #[test]
    fn advance_without_answer_leaves_state_unchanged() {
        let mut session = five_phase();
        session.advance().unwrap(); // past the introduction
        let before = session.state().clone();
        let err = session.advance().unwrap_err();
        assert_eq!(
            err,
            AssessmentError::IncompleteAnswer {
                question_id: "p1".into()
            }
        );
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn retreat_then_readvance_round_trips() {
        let mut session = five_phase();
        session.advance().unwrap();
        answer_current_validly(&mut session);
        session.advance().unwrap();
        answer_current_validly(&mut session);
        session.advance().unwrap(); // technical, t1
        let before = session.state().clone();

        assert_eq!(session.retreat(), Transition::PreviousPhase);
        assert_eq!(session.current_question().unwrap().id, "p2");
        assert_eq!(session.advance().unwrap(), Transition::NextPhase);
        assert_eq!(session.state(), &before);
        assert_eq!(
            session.answers(1).unwrap().get("p2"),
            Some(&AnswerValue::Choice("first".into()))
        );
    }

    #[test]
    fn retreat_stops_at_first_content_question() {
        let mut session = five_phase();
        assert_eq!(session.retreat(), Transition::Stayed);
        session.advance().unwrap();
        assert!(session.position().is_first);
        assert_eq!(session.retreat(), Transition::Stayed);
        assert_eq!(session.state().phase_index, 1);
    }

    #[test]
    fn reset_matches_a_fresh_session() {
        let mut session = five_phase();
        session.advance().unwrap();
        for _ in 0..4 {
            answer_current_validly(&mut session);
            session.advance().unwrap();
        }
        assert!(session.is_complete());

        session.reset();
        assert_eq!(session.state(), five_phase().state());
        assert!(!session.is_complete());
    }

    #[test]
    fn completion_parks_on_results_phase() {
        let mut session = five_phase();
        session.advance().unwrap();
        for _ in 0..3 {
            answer_current_validly(&mut session);
            assert_ne!(session.advance().unwrap(), Transition::Completed);
        }
        assert!(session.position().is_last);
        answer_current_validly(&mut session);
        assert_eq!(session.advance().unwrap(), Transition::Completed);

        assert_eq!(session.state().phase_index, 4);
        assert_eq!(
            session.current_question().unwrap_err(),
            AssessmentError::AlreadyComplete
        );
        assert_eq!(
            session.advance().unwrap_err(),
            AssessmentError::AlreadyComplete
        );
        assert_eq!(session.retreat(), Transition::Stayed);
        assert_eq!(
            session
                .record_answer(1, "p1", AnswerValue::Scale(2))
                .unwrap_err(),
            AssessmentError::AlreadyComplete
        );
    }

    #[test]
    fn bookend_has_no_current_question() {
        let session = five_phase();
        let err = session.current_question().unwrap_err();
        assert_eq!(
            err,
            AssessmentError::OutOfQuestions {
                phase: "introduction".into()
            }
        );
        assert_eq!(session.position().question_number, 0);
    }

    #[test]
    fn record_answer_rejects_bad_input() {
        let mut session = two_phase();
        let out_of_range = session.record_answer(0, "a1", AnswerValue::Scale(6));
        assert!(matches!(out_of_range, Err(AssessmentError::Validation { .. })));

        let unknown = session.record_answer(0, "zz", AnswerValue::Scale(3));
        assert!(unknown.unwrap_err().to_string().contains("not part of phase"));

        let bad_phase = session.record_answer(9, "a1", AnswerValue::Scale(3));
        assert!(bad_phase.unwrap_err().to_string().contains("out of range"));

        let unreached = session.record_answer(1, "b1", AnswerValue::Choice("first".into()));
        assert!(unreached.unwrap_err().to_string().contains("not been reached"));

        assert!(session.answers(0).unwrap().is_empty());
        assert!(session.answers(1).unwrap().is_empty());
    }

    #[test]
    fn answers_can_be_overwritten() {
        let mut session = two_phase();
        session.answer_current(AnswerValue::Scale(2)).unwrap();
        session.answer_current(AnswerValue::Scale(5)).unwrap();
        assert_eq!(
            session.answers(0).unwrap().get("a1"),
            Some(&AnswerValue::Scale(5))
        );
    }

    #[test]
    fn answers_are_scoped_per_phase() {
        let mut session = AssessmentSession::new(bank(vec![
            phase("a", vec![scale("same")]),
            phase("b", vec![scale("same")]),
        ]))
        .unwrap();
        session.answer_current(AnswerValue::Scale(1)).unwrap();
        session.advance().unwrap();
        session.answer_current(AnswerValue::Scale(5)).unwrap();

        let sheet = session.answer_sheet();
        assert_eq!(sheet.answer("a", "same"), Some(&AnswerValue::Scale(1)));
        assert_eq!(sheet.answer("b", "same"), Some(&AnswerValue::Scale(5)));
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut session = five_phase();
        // Deterministic pseudo-random walk of answers, advances, retreats and resets.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            match seed % 7 {
                0 | 1 => {
                    if session.current_question().is_ok() && !session.is_complete() {
                        answer_current_validly(&mut session);
                    }
                }
                2 | 3 => {
                    let _ = session.advance();
                }
                4 | 5 => {
                    session.retreat();
                }
                _ => {
                    if seed % 5 == 0 {
                        session.reset();
                    }
                }
            }
            assert_in_bounds(&session);
        }
    }

    #[test]
    fn progress_tracks_phase_status() {
        let mut session = five_phase();
        session.advance().unwrap();
        answer_current_validly(&mut session);

        let progress = session.progress();
        assert_eq!(progress.len(), 5);
        assert_eq!(progress[0].status, PhaseStatus::Done);
        assert_eq!(progress[1].status, PhaseStatus::Current);
        assert_eq!(progress[1].answered, 1);
        assert_eq!(progress[1].total, 2);
        assert_eq!(progress[2].status, PhaseStatus::Upcoming);

        let position = session.position();
        assert_eq!(position.phase_id, "psychometric");
        assert_eq!(position.question_number, 1);
        assert_eq!(position.total_questions, 2);
    }

    #[test]
    fn replay_drives_to_completion() {
        let mut session = five_phase();
        let mut answers = vec![AnswerRecord::new(); 5];
        answers[1].insert("p1".into(), AnswerValue::Scale(3));
        answers[1].insert("p2".into(), AnswerValue::Choice("second".into()));
        answers[2].insert("t1".into(), AnswerValue::Choice("first".into()));
        answers[2].insert("t2".into(), AnswerValue::Scale(5));

        session.replay(&answers).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.state().answers, answers);
    }

    #[test]
    fn replay_stops_at_first_gap() {
        let mut session = five_phase();
        let mut answers = vec![AnswerRecord::new(); 5];
        answers[1].insert("p1".into(), AnswerValue::Scale(3));

        let err = session.replay(&answers).unwrap_err();
        assert_eq!(
            err,
            AssessmentError::IncompleteAnswer {
                question_id: "p2".into()
            }
        );
        assert_eq!(session.current_question().unwrap().id, "p2");

        answers[1].insert("p2".into(), AnswerValue::Scale(9));
        assert!(matches!(
            session.replay(&answers),
            Err(AssessmentError::Validation { .. })
        ));
    }

    #[test]
    fn bank_without_content_completes_immediately() {
        let mut session =
            AssessmentSession::new(bank(vec![phase("intro", vec![]), phase("results", vec![])]))
                .unwrap();
        assert_eq!(session.advance().unwrap(), Transition::Completed);
        assert!(session.compute_result(&fixed_result).is_ok());
    }

    #[test]
    fn rejects_malformed_banks() {
        assert!(AssessmentSession::new(bank(vec![])).is_err());
        let duplicate = bank(vec![phase("a", vec![scale("x"), scale("x")])]);
        let err = AssessmentSession::new(duplicate).unwrap_err();
        assert!(err.to_string().contains("duplicate question id"));
    }

    #[test]
    fn sessions_share_a_bank_independently() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AssessmentSession>();

        let shared = bank(vec![phase("a", vec![scale("a1")])]);
        let mut first = AssessmentSession::new(Arc::clone(&shared)).unwrap();
        let second = AssessmentSession::new(shared).unwrap();
        first.answer_current(AnswerValue::Scale(3)).unwrap();
        first.advance().unwrap();
        assert!(first.is_complete());
        assert!(!second.is_complete());
        assert!(second.answers(0).unwrap().is_empty());
    }
}
