//! Quiz factories: question selection, eligibility gates, and scoring.
//!
//! [`RegularQuiz`] and [`RevisionQuiz`] share their pool handling through
//! [`QuestionPool`] and their workflow through the provided methods of
//! [`QuizFactory`]. Each variant only decides which instances it may create,
//! who may take it, and which statistics slot a score lands in.
//!
//! Scores taken through a factory are judged by the factory's
//! [`GradingRules`](crate::GradingRules), not the rules stored on the
//! student's own statistics.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{QuizPolicy, RegularHistoryPolicy};
use crate::error::QuizError;
use crate::history::QuizHistory;
use crate::pool::QuestionPool;
use crate::question::Question;
use crate::statistics::Statistics;
use crate::student::{Student, StudentKey};

/// Which factory produced a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizKind {
    Regular,
    Revision,
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizKind::Regular => write!(f, "regular"),
            QuizKind::Revision => write!(f, "revision"),
        }
    }
}

/// A generated quiz paper.
#[derive(Debug, Clone)]
pub struct Quiz {
    /// Unique quiz identifier.
    pub id: Uuid,
    pub kind: QuizKind,
    /// Selected questions in presentation order.
    pub questions: Vec<Arc<Question>>,
    /// The student a revision quiz was assembled for.
    pub student: Option<StudentKey>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    fn new(kind: QuizKind, questions: Vec<Arc<Question>>, student: Option<StudentKey>) -> Self {
        let quiz = Self {
            id: Uuid::new_v4(),
            kind,
            questions,
            student,
            created_at: Utc::now(),
        };
        tracing::debug!(quiz_id = %quiz.id, kind = %kind, size = quiz.len(), "generated quiz");
        quiz
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Shared quiz workflow over a fixed question pool.
pub trait QuizFactory {
    fn kind(&self) -> QuizKind;

    fn pool(&self) -> &QuestionPool;

    fn pool_mut(&mut self) -> &mut QuestionPool;

    fn policy(&self) -> &QuizPolicy;

    /// Wrap selected questions into a regular quiz.
    fn create_quiz_instance(&self, questions: Vec<Arc<Question>>) -> crate::Result<Quiz>;

    /// Wrap selected questions into a revision quiz for `student`.
    fn create_revision_quiz_instance(
        &self,
        questions: Vec<Arc<Question>>,
        student: &Student,
    ) -> crate::Result<Quiz>;

    /// Eligibility gate applied before scoring, under `policy().grading`.
    fn can_take(&self, statistics: &Statistics) -> bool;

    /// Store a finished attempt's score, judged by `policy().grading`.
    fn record_score(&self, statistics: &mut Statistics, score: f64) -> crate::Result<()>;

    /// Message used when [`QuizFactory::can_take`] refuses a student.
    fn refusal(&self) -> &'static str;

    /// Fails with `UnsupportedOperation` unless this factory builds `kind`
    /// quizzes. Checked before sampling, so a refused call leaves the pool's
    /// RNG where it was.
    fn ensure_supports(&self, kind: QuizKind) -> crate::Result<()> {
        if self.kind() == kind {
            Ok(())
        } else {
            Err(QuizError::unsupported(format!(
                "a {} factory cannot generate a {kind} quiz",
                self.kind()
            )))
        }
    }

    /// Draw `n` questions from the whole pool, ignoring history.
    fn generate_quiz(&mut self, n: usize) -> crate::Result<Quiz> {
        self.ensure_supports(QuizKind::Regular)?;
        let questions = self.pool_mut().sample(n)?;
        self.create_quiz_instance(questions)
    }

    /// Draw `n` questions for `student` under the configured
    /// [`RegularHistoryPolicy`].
    fn generate_quiz_for(
        &mut self,
        history: &QuizHistory,
        student: &Student,
        n: usize,
    ) -> crate::Result<Quiz> {
        match self.policy().regular_history {
            RegularHistoryPolicy::AllowRepeats => self.generate_quiz(n),
            RegularHistoryPolicy::ExcludeSeen => {
                self.ensure_supports(QuizKind::Regular)?;
                if n > self.pool().len() {
                    return Err(QuizError::invalid(format!(
                        "invalid number of questions {n}, must be between 1 and {}",
                        self.pool().len()
                    )));
                }
                let questions = self.pool_mut().sample_unseen(history.seen(student), n)?;
                self.create_quiz_instance(questions)
            }
        }
    }

    /// Draw `n` questions the student has not seen yet.
    fn revise(
        &mut self,
        history: &QuizHistory,
        student: &Student,
        n: usize,
    ) -> crate::Result<Quiz> {
        self.ensure_supports(QuizKind::Revision)?;
        let statistics = student.statistics();
        if !statistics.can_take_revision_with(&self.policy().grading) {
            tracing::warn!(student = %student, verdict = %statistics.verdict(), "revision refused");
            return Err(QuizError::illegal_state(
                "Cannot take more revision quizzes",
                statistics.verdict(),
            ));
        }
        let questions = self.pool_mut().sample_unseen(history.seen(student), n)?;
        self.create_revision_quiz_instance(questions, student)
    }

    /// Append an attempt's questions to the student's history.
    fn record_seen(&self, history: &mut QuizHistory, student: &Student, questions: &[Arc<Question>]) {
        history.record(student, questions);
    }

    /// Grade `answers` positionally against `questions`, update the
    /// student's statistics, and record the questions as seen.
    ///
    /// Nothing is mutated when the attempt is rejected.
    fn take_quiz<S: AsRef<str>>(
        &self,
        history: &mut QuizHistory,
        student: &mut Student,
        questions: &[Arc<Question>],
        answers: &[S],
    ) -> crate::Result<f64> {
        if questions.len() != answers.len() {
            return Err(QuizError::invalid(format!(
                "got {} answers for {} questions",
                answers.len(),
                questions.len()
            )));
        }
        if questions.is_empty() {
            return Err(QuizError::invalid("a quiz needs at least one question"));
        }
        if !self.can_take(student.statistics()) {
            let verdict = student.statistics().verdict();
            tracing::warn!(student = %student, kind = %self.kind(), verdict = %verdict, "attempt refused");
            return Err(QuizError::illegal_state(self.refusal(), verdict));
        }

        let correct = questions
            .iter()
            .zip(answers)
            .filter(|&(question, answer)| question.check_answer(answer.as_ref()))
            .count();
        let score = correct as f64 / questions.len() as f64;

        self.record_score(student.statistics_mut(), score)?;
        self.record_seen(history, student, questions);

        tracing::info!(
            student = %student,
            kind = %self.kind(),
            correct,
            total = questions.len(),
            score,
            verdict = %student.statistics().verdict(),
            "quiz taken"
        );
        Ok(score)
    }

    /// Take a generated quiz. The quiz must come from this kind of factory
    /// and, for revision quizzes, belong to `student`.
    fn take<S: AsRef<str>>(
        &self,
        history: &mut QuizHistory,
        student: &mut Student,
        quiz: &Quiz,
        answers: &[S],
    ) -> crate::Result<f64> {
        if quiz.kind != self.kind() {
            return Err(QuizError::unsupported(format!(
                "a {} quiz cannot be taken through the {} factory",
                quiz.kind,
                self.kind()
            )));
        }
        if let Some(owner) = &quiz.student {
            if *owner != student.key() {
                return Err(QuizError::invalid(format!(
                    "quiz {} was assembled for a different student",
                    quiz.id
                )));
            }
        }
        self.take_quiz(history, student, &quiz.questions, answers)
    }
}

/// Primary assessment quizzes; scores count toward PASS and FAIL.
#[derive(Debug, Clone)]
pub struct RegularQuiz {
    pool: QuestionPool,
    policy: QuizPolicy,
}

impl RegularQuiz {
    pub fn new<I>(questions: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = Question>,
    {
        Self::with_policy(questions, QuizPolicy::default())
    }

    pub fn with_policy<I>(questions: I, policy: QuizPolicy) -> crate::Result<Self>
    where
        I: IntoIterator<Item = Question>,
    {
        policy.validate()?;
        let pool = QuestionPool::new(questions, policy.seed)?;
        Ok(Self { pool, policy })
    }

    /// Build around an existing pool, e.g. one shared with a [`RevisionQuiz`].
    pub fn from_pool(pool: QuestionPool, policy: QuizPolicy) -> crate::Result<Self> {
        policy.validate()?;
        Ok(Self { pool, policy })
    }
}

impl QuizFactory for RegularQuiz {
    fn kind(&self) -> QuizKind {
        QuizKind::Regular
    }

    fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    fn pool_mut(&mut self) -> &mut QuestionPool {
        &mut self.pool
    }

    fn policy(&self) -> &QuizPolicy {
        &self.policy
    }

    fn create_quiz_instance(&self, questions: Vec<Arc<Question>>) -> crate::Result<Quiz> {
        Ok(Quiz::new(QuizKind::Regular, questions, None))
    }

    fn create_revision_quiz_instance(
        &self,
        _questions: Vec<Arc<Question>>,
        _student: &Student,
    ) -> crate::Result<Quiz> {
        Err(QuizError::unsupported(
            "RegularQuiz cannot generate a revision quiz",
        ))
    }

    fn can_take(&self, statistics: &Statistics) -> bool {
        statistics.can_take_regular()
    }

    fn record_score(&self, statistics: &mut Statistics, score: f64) -> crate::Result<()> {
        statistics.record_regular_score_with(&self.policy.grading, score)
    }

    fn refusal(&self) -> &'static str {
        "Student cannot take more regular quizzes"
    }
}

/// Remedial quizzes drawn from unseen questions; capped, and never a cause
/// of FAIL.
#[derive(Debug, Clone)]
pub struct RevisionQuiz {
    pool: QuestionPool,
    policy: QuizPolicy,
}

impl RevisionQuiz {
    pub fn new<I>(questions: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = Question>,
    {
        Self::with_policy(questions, QuizPolicy::default())
    }

    pub fn with_policy<I>(questions: I, policy: QuizPolicy) -> crate::Result<Self>
    where
        I: IntoIterator<Item = Question>,
    {
        policy.validate()?;
        let pool = QuestionPool::new(questions, policy.seed)?;
        Ok(Self { pool, policy })
    }

    pub fn from_pool(pool: QuestionPool, policy: QuizPolicy) -> crate::Result<Self> {
        policy.validate()?;
        Ok(Self { pool, policy })
    }
}

impl QuizFactory for RevisionQuiz {
    fn kind(&self) -> QuizKind {
        QuizKind::Revision
    }

    fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    fn pool_mut(&mut self) -> &mut QuestionPool {
        &mut self.pool
    }

    fn policy(&self) -> &QuizPolicy {
        &self.policy
    }

    fn create_quiz_instance(&self, _questions: Vec<Arc<Question>>) -> crate::Result<Quiz> {
        Err(QuizError::unsupported(
            "RevisionQuiz cannot generate a regular quiz",
        ))
    }

    fn create_revision_quiz_instance(
        &self,
        questions: Vec<Arc<Question>>,
        student: &Student,
    ) -> crate::Result<Quiz> {
        Ok(Quiz::new(QuizKind::Revision, questions, Some(student.key())))
    }

    fn can_take(&self, statistics: &Statistics) -> bool {
        statistics.can_take_revision_with(&self.policy.grading)
    }

    fn record_score(&self, statistics: &mut Statistics, score: f64) -> crate::Result<()> {
        statistics.record_revision_score_with(&self.policy.grading, score)
    }

    fn refusal(&self) -> &'static str {
        "Cannot take more revision quizzes"
    }
}
