//! Student identity and owned statistics.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::GradingRules;
use crate::error::QuizError;
use crate::statistics::Statistics;

/// Stable identity used to index per-student history.
///
/// Names are stored lowercased so that "John Doe" and "john doe" born on the
/// same day map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudentKey {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

/// A student taking quizzes.
#[derive(Debug, Clone)]
pub struct Student {
    first_name: String,
    last_name: String,
    birth_date: NaiveDate,
    statistics: Statistics,
}

impl Student {
    /// Create a student with statistics under the default grading rules.
    pub fn new(first_name: &str, last_name: &str, birth_date: NaiveDate) -> crate::Result<Self> {
        Self::with_rules(first_name, last_name, birth_date, GradingRules::default())
    }

    pub fn with_rules(
        first_name: &str,
        last_name: &str,
        birth_date: NaiveDate,
        rules: GradingRules,
    ) -> crate::Result<Self> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(QuizError::invalid("student names cannot be blank"));
        }
        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birth_date,
            statistics: Statistics::with_rules(rules)?,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Full name, "First Last".
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }

    pub fn key(&self) -> StudentKey {
        StudentKey {
            first_name: self.first_name.to_lowercase(),
            last_name: self.last_name.to_lowercase(),
            birth_date: self.birth_date,
        }
    }
}

impl PartialEq for Student {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Student {}

impl Hash for Student {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (born {})",
            self.first_name, self.last_name, self.birth_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::Verdict;

    fn jan_first_1990() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
    }

    #[test]
    fn names_are_trimmed() {
        let student = Student::new("   John   ", "   Doe   ", jan_first_1990()).unwrap();
        assert_eq!(student.first_name(), "John");
        assert_eq!(student.last_name(), "Doe");
        assert_eq!(student.name(), "John Doe");
        assert_eq!(student.birth_date(), jan_first_1990());
    }

    #[test]
    fn equality_ignores_name_case() {
        let a = Student::new("John", "Doe", jan_first_1990()).unwrap();
        let b = Student::new("john", "DOE", jan_first_1990()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn different_identity_is_not_equal() {
        let a = Student::new("John", "Doe", jan_first_1990()).unwrap();
        let b = Student::new("John", "Smith", jan_first_1990()).unwrap();
        let c = Student::new("John", "Doe", NaiveDate::from_ymd_opt(1991, 2, 1).unwrap()).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_includes_birth_date() {
        let student = Student::new("John", "Doe", jan_first_1990()).unwrap();
        assert_eq!(student.to_string(), "John Doe (born 1990-01-01)");
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(Student::new(" ", "Doe", jan_first_1990())
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn owns_fresh_statistics() {
        let mut student = Student::new("John", "Doe", jan_first_1990()).unwrap();
        assert_eq!(student.statistics().verdict(), Verdict::Pending);
        student.statistics_mut().record_regular_score(0.9).unwrap();
        assert_eq!(student.statistics().verdict(), Verdict::Pass);
    }

    #[test]
    fn with_rules_rejects_unusable_rules() {
        let rules = GradingRules {
            pass_threshold: 0.0,
            max_regular_attempts: 0,
            max_revision_attempts: 0,
        };
        let err = Student::with_rules("John", "Doe", jan_first_1990(), rules).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("pass_threshold"));
    }

    #[test]
    fn with_rules_applies_custom_threshold() {
        let rules = GradingRules {
            pass_threshold: 0.8,
            ..GradingRules::default()
        };
        let mut student = Student::with_rules("John", "Doe", jan_first_1990(), rules).unwrap();
        student.statistics_mut().record_regular_score(0.5).unwrap();
        assert_eq!(student.statistics().verdict(), Verdict::Pending);
    }
}
