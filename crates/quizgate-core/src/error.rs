//! Quiz error types.
//!
//! Every fallible operation in this crate returns a [`QuizError`]. Errors are
//! raised before any history or statistics mutation, so a rejected call
//! leaves the caller's state exactly as it was.

use thiserror::Error;

use crate::statistics::Verdict;

/// Errors that can occur while generating, taking, or grading quizzes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuizError {
    /// Malformed input: bad constructor arguments, out-of-range counts or
    /// scores, mismatched answers, or too few unseen questions.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The student's verdict or attempt count forbids the operation.
    #[error("{message}. Final verdict: {verdict}")]
    IllegalState { message: String, verdict: Verdict },

    /// The operation belongs to the other quiz variant.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl QuizError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        QuizError::InvalidArgument(message.into())
    }

    pub(crate) fn illegal_state(message: impl Into<String>, verdict: Verdict) -> Self {
        QuizError::IllegalState {
            message: message.into(),
            verdict,
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        QuizError::UnsupportedOperation(message.into())
    }

    /// Returns `true` for [`QuizError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, QuizError::InvalidArgument(_))
    }

    /// Returns `true` for [`QuizError::IllegalState`].
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, QuizError::IllegalState { .. })
    }

    /// Returns `true` for [`QuizError::UnsupportedOperation`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, QuizError::UnsupportedOperation(_))
    }

    /// The verdict carried by an illegal-state error, for display.
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            QuizError::IllegalState { verdict, .. } => Some(*verdict),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_state_message_names_verdict() {
        let err = QuizError::illegal_state("Cannot take more revision quizzes", Verdict::Pending);
        assert_eq!(
            err.to_string(),
            "Cannot take more revision quizzes. Final verdict: PENDING"
        );
        assert_eq!(err.verdict(), Some(Verdict::Pending));
        assert!(err.is_illegal_state());
    }

    #[test]
    fn classification_helpers() {
        assert!(QuizError::invalid("n must be positive").is_invalid_argument());
        assert!(QuizError::unsupported("nope").is_unsupported());
        assert_eq!(QuizError::invalid("x").verdict(), None);
    }
}
