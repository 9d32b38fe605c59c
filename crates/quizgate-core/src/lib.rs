//! quizgate-core — Quiz eligibility, history, and verdict rules.
//!
//! This crate defines the question model, per-student statistics, and the
//! quiz factories that decide who may take which quiz and how answers are
//! graded.

pub mod config;
pub mod error;
pub mod history;
pub mod pool;
pub mod question;
pub mod quiz;
pub mod statistics;
pub mod student;

pub use config::{GradingRules, QuizPolicy, RegularHistoryPolicy};
pub use error::{QuizError, Result};
pub use history::QuizHistory;
pub use pool::QuestionPool;
pub use question::Question;
pub use quiz::{Quiz, QuizFactory, QuizKind, RegularQuiz, RevisionQuiz};
pub use statistics::{Statistics, StatisticsSnapshot, Verdict};
pub use student::{Student, StudentKey};
