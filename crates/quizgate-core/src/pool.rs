//! The fixed question pool shared by both quiz factories.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::QuizError;
use crate::question::Question;

/// An immutable, non-empty set of questions plus the RNG used to draw from it.
#[derive(Debug, Clone)]
pub struct QuestionPool {
    questions: Vec<Arc<Question>>,
    rng: StdRng,
}

impl QuestionPool {
    /// Build a pool. A `seed` makes every draw reproducible.
    pub fn new<I>(questions: I, seed: Option<u64>) -> crate::Result<Self>
    where
        I: IntoIterator<Item = Question>,
    {
        Self::from_shared(questions.into_iter().map(Arc::new).collect(), seed)
    }

    /// Build a pool from questions that are already shared elsewhere.
    ///
    /// Questions are compared by value; a repeated question is rejected.
    pub fn from_shared(questions: Vec<Arc<Question>>, seed: Option<u64>) -> crate::Result<Self> {
        if questions.is_empty() {
            return Err(QuizError::invalid("the question pool cannot be empty"));
        }
        let mut distinct: HashSet<&Question> = HashSet::with_capacity(questions.len());
        if let Some(repeated) = questions.iter().find(|q| !distinct.insert(Arc::as_ref(*q))) {
            tracing::warn!(formulation = repeated.formulation(), "duplicate question in pool");
            return Err(QuizError::invalid(format!(
                "duplicate question in pool: {repeated}"
            )));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { questions, rng })
    }

    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Shuffle the whole pool and take `n`. Requires `1 <= n <= len`.
    pub fn sample(&mut self, n: usize) -> crate::Result<Vec<Arc<Question>>> {
        if n < 1 || n > self.questions.len() {
            return Err(QuizError::invalid(format!(
                "invalid number of questions {n}, must be between 1 and {}",
                self.questions.len()
            )));
        }
        let mut selected = self.questions.clone();
        selected.shuffle(&mut self.rng);
        selected.truncate(n);
        Ok(selected)
    }

    /// Shuffle the questions absent from `seen` and take `n`.
    pub fn sample_unseen(
        &mut self,
        seen: &[Arc<Question>],
        n: usize,
    ) -> crate::Result<Vec<Arc<Question>>> {
        if n < 1 {
            return Err(QuizError::invalid("number of questions must be at least 1"));
        }
        let mut unseen: Vec<Arc<Question>> = self
            .questions
            .iter()
            .filter(|q| !seen.contains(*q))
            .cloned()
            .collect();
        if unseen.len() < n {
            return Err(QuizError::invalid(format!(
                "not enough unseen questions: requested {n}, {} available",
                unseen.len()
            )));
        }
        unseen.shuffle(&mut self.rng);
        unseen.truncate(n);
        Ok(unseen)
    }
}
