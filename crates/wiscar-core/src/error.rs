//! Assessment error types.
//!
//! Every variant is a local, recoverable condition: callers re-prompt the
//! user or block the action that triggered it. Nothing here is fatal.

use thiserror::Error;

/// Errors raised by the session engine and the radar layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssessmentError {
    /// A malformed or out-of-range answer, question bank or geometry input.
    #[error("invalid {subject}: {reason}")]
    Validation { subject: String, reason: String },

    /// `advance()` was attempted without a valid answer for the current question.
    #[error("question '{question_id}' has no answer yet")]
    IncompleteAnswer { question_id: String },

    /// The current phase is a bookend with no questions.
    #[error("phase '{phase}' has no questions")]
    OutOfQuestions { phase: String },

    /// A result was requested before the session reached its terminal state.
    #[error("assessment is not complete")]
    NotComplete,

    /// Forward movement, new answers or a current question were requested on a
    /// completed session.
    #[error("assessment already completed; reset to retake it")]
    AlreadyComplete,
}

impl AssessmentError {
    pub(crate) fn validation(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        AssessmentError::Validation {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the user can fix this by changing their input,
    /// as opposed to a navigation request that is illegal in the current state.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AssessmentError::Validation { .. } | AssessmentError::IncompleteAnswer { .. }
        )
    }
}
