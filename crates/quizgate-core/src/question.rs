//! Question variants and answer matching.
//!
//! A [`Question`] is immutable once built. Expected answers are normalized at
//! construction so that [`Question::check_answer`] only has to normalize the
//! submitted side.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::QuizError;

/// Minimum number of accepted literals for a multiple-choice question.
pub const MIN_CHOICES: usize = 2;
/// Maximum number of accepted literals for a multiple-choice question.
pub const MAX_CHOICES: usize = 4;

/// A unit of assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Question {
    FreeResponse(FreeResponse),
    MultipleChoice(MultipleChoice),
}

impl Question {
    /// Build a free-response question.
    pub fn free_response(formulation: &str, answer: &str) -> crate::Result<Self> {
        FreeResponse::new(formulation, answer).map(Question::FreeResponse)
    }

    /// Build a multiple-choice question from its accepted literals.
    pub fn multiple_choice<S: AsRef<str>>(formulation: &str, answers: &[S]) -> crate::Result<Self> {
        MultipleChoice::new(formulation, answers).map(Question::MultipleChoice)
    }

    /// The text presented to the student.
    pub fn formulation(&self) -> &str {
        match self {
            Question::FreeResponse(q) => &q.formulation,
            Question::MultipleChoice(q) => &q.formulation,
        }
    }

    /// Whether `answer` matches the expected answer.
    pub fn check_answer(&self, answer: &str) -> bool {
        match self {
            Question::FreeResponse(q) => q.check_answer(answer),
            Question::MultipleChoice(q) => q.check_answer(answer),
        }
    }

    /// Short variant name used in log fields.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Question::FreeResponse(_) => "free-response",
            Question::MultipleChoice(_) => "multiple-choice",
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.formulation())
    }
}

/// A question answered in plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FreeResponse {
    formulation: String,
    expected: String,
}

impl FreeResponse {
    pub fn new(formulation: &str, answer: &str) -> crate::Result<Self> {
        let formulation = checked_formulation(formulation)?;
        let expected = normalize_free_text(answer);
        if expected.is_empty() {
            return Err(QuizError::invalid("free-response answer cannot be blank"));
        }
        Ok(Self {
            formulation,
            expected,
        })
    }

    /// The normalized expected answer.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Case-insensitive comparison that ignores surrounding whitespace and
    /// treats any run of internal whitespace as one space.
    pub fn check_answer(&self, answer: &str) -> bool {
        let given = normalize_free_text(answer);
        !given.is_empty() && given == self.expected
    }
}

/// A question whose answer is a set of literals, submitted comma-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultipleChoice {
    formulation: String,
    expected: BTreeSet<String>,
}

impl MultipleChoice {
    pub fn new<S: AsRef<str>>(formulation: &str, answers: &[S]) -> crate::Result<Self> {
        if !(MIN_CHOICES..=MAX_CHOICES).contains(&answers.len()) {
            return Err(QuizError::invalid(format!(
                "multiple choice questions must have between {MIN_CHOICES} and {MAX_CHOICES} correct answers, got {}",
                answers.len()
            )));
        }
        let formulation = checked_formulation(formulation)?;

        let mut expected = BTreeSet::new();
        for answer in answers {
            let literal = normalize_literal(answer.as_ref());
            if literal.is_empty() {
                return Err(QuizError::invalid(
                    "multiple choice answers cannot be blank",
                ));
            }
            expected.insert(literal);
        }

        Ok(Self {
            formulation,
            expected,
        })
    }

    /// The normalized set of accepted literals.
    pub fn expected(&self) -> &BTreeSet<String> {
        &self.expected
    }

    /// Exact set equality; partial selections earn nothing.
    pub fn check_answer(&self, answer: &str) -> bool {
        if answer.trim().is_empty() {
            return false;
        }
        let given: BTreeSet<String> = answer.split(',').map(normalize_literal).collect();
        given == self.expected
    }
}

fn checked_formulation(formulation: &str) -> crate::Result<String> {
    let trimmed = formulation.trim();
    if trimmed.is_empty() {
        return Err(QuizError::invalid("question formulation cannot be blank"));
    }
    Ok(trimmed.to_string())
}

fn normalize_free_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn normalize_literal(literal: &str) -> String {
    literal.trim().to_lowercase()
}
