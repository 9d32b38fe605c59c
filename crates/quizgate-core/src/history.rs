//! Per-student record of administered questions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::question::Question;
use crate::student::{Student, StudentKey};

/// Questions each student has already been shown, in the order they were
/// administered.
///
/// The store is append-only and owned by the caller; factories borrow it for
/// the duration of a single operation.
#[derive(Debug, Clone, Default)]
pub struct QuizHistory {
    seen: HashMap<StudentKey, Vec<Arc<Question>>>,
}

impl QuizHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `questions` to the student's history. Duplicates accumulate.
    pub fn record(&mut self, student: &Student, questions: &[Arc<Question>]) {
        tracing::debug!(student = %student, count = questions.len(), "recording seen questions");
        self.seen
            .entry(student.key())
            .or_default()
            .extend(questions.iter().cloned());
    }

    /// Everything the student has seen, oldest first.
    pub fn seen(&self, student: &Student) -> &[Arc<Question>] {
        self.seen
            .get(&student.key())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_seen(&self, student: &Student, question: &Question) -> bool {
        self.seen(student).iter().any(|q| q.as_ref() == question)
    }

    /// Number of students with at least one recorded question.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn student(first: &str) -> Student {
        Student::new(first, "Smith", NaiveDate::from_ymd_opt(1997, 7, 15).unwrap()).unwrap()
    }

    fn question(text: &str) -> Arc<Question> {
        Arc::new(Question::free_response(text, "answer").unwrap())
    }

    #[test]
    fn unknown_student_has_empty_history() {
        let history = QuizHistory::new();
        assert!(history.seen(&student("Jhostin")).is_empty());
        assert!(history.is_empty());
    }

    #[test]
    fn record_appends_in_order_and_keeps_duplicates() {
        let mut history = QuizHistory::new();
        let s = student("Jhostin");
        let (q1, q2) = (question("one"), question("two"));

        history.record(&s, &[q1.clone(), q2.clone()]);
        history.record(&s, &[q1.clone()]);

        let seen = history.seen(&s);
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], q1);
        assert_eq!(seen[1], q2);
        assert!(history.has_seen(&s, &q2));
    }

    #[test]
    fn keyed_by_case_insensitive_identity() {
        let mut history = QuizHistory::new();
        history.record(&student("Jhostin"), &[question("one")]);

        assert_eq!(history.seen(&student("JHOSTIN")).len(), 1);
        assert!(history.seen(&student("Maria")).is_empty());
        assert_eq!(history.len(), 1);
    }
}
