//! Per-student attempt statistics and the verdict state machine.
//!
//! A student starts PENDING. A regular or revision score at or above the pass
//! threshold moves the verdict to PASS; exhausting the regular attempts below
//! the threshold moves it to FAIL. Both are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::GradingRules;
use crate::error::QuizError;

/// Final status derived from quiz scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    #[default]
    Pending,
    Pass,
    Fail,
}

impl Verdict {
    /// PASS and FAIL accept no further scores.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Verdict::Pending)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pending => write!(f, "PENDING"),
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" | "TBD" => Ok(Verdict::Pending),
            "PASS" => Ok(Verdict::Pass),
            "FAIL" => Ok(Verdict::Fail),
            other => Err(format!("unknown verdict: {other}")),
        }
    }
}

/// Attempt log for one student.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    rules: GradingRules,
    regular_scores: Vec<f64>,
    revision_scores: Vec<f64>,
    regular_attempts: u32,
    revision_attempts: u32,
    verdict: Verdict,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Empty statistics under the default grading rules.
    pub fn new() -> Self {
        Self::empty(GradingRules::default())
    }

    /// Empty statistics under custom rules, rejected if the rules are unusable.
    pub fn with_rules(rules: GradingRules) -> crate::Result<Self> {
        rules.validate()?;
        Ok(Self::empty(rules))
    }

    fn empty(rules: GradingRules) -> Self {
        Self {
            rules,
            regular_scores: Vec::new(),
            revision_scores: Vec::new(),
            regular_attempts: 0,
            revision_attempts: 0,
            verdict: Verdict::Pending,
        }
    }

    /// Record a regular quiz score.
    ///
    /// Ignored once the verdict is terminal. A passing score yields PASS;
    /// otherwise the attempt that reaches the regular cap yields FAIL.
    pub fn record_regular_score(&mut self, score: f64) -> crate::Result<()> {
        let rules = self.rules;
        self.record_regular_score_with(&rules, score)
    }

    /// Record a regular score judged by `rules` instead of the student's own.
    pub(crate) fn record_regular_score_with(
        &mut self,
        rules: &GradingRules,
        score: f64,
    ) -> crate::Result<()> {
        check_score(score)?;
        if self.verdict.is_terminal() {
            tracing::warn!(score, verdict = %self.verdict, "ignoring regular score after final verdict");
            return Ok(());
        }

        self.regular_scores.push(score);
        self.regular_attempts += 1;

        if score >= rules.pass_threshold {
            self.set_verdict(Verdict::Pass);
        } else if self.regular_attempts >= rules.max_regular_attempts {
            self.set_verdict(Verdict::Fail);
        }
        Ok(())
    }

    /// Record a revision quiz score.
    ///
    /// Ignored once the verdict is terminal or the revision cap is reached.
    /// A passing score yields PASS; revision attempts never cause FAIL.
    pub fn record_revision_score(&mut self, score: f64) -> crate::Result<()> {
        let rules = self.rules;
        self.record_revision_score_with(&rules, score)
    }

    pub(crate) fn record_revision_score_with(
        &mut self,
        rules: &GradingRules,
        score: f64,
    ) -> crate::Result<()> {
        check_score(score)?;
        if !self.can_take_revision_with(rules) {
            tracing::warn!(
                score,
                verdict = %self.verdict,
                revision_attempts = self.revision_attempts,
                "ignoring revision score"
            );
            return Ok(());
        }

        self.revision_scores.push(score);
        self.revision_attempts += 1;

        if score >= rules.pass_threshold {
            self.set_verdict(Verdict::Pass);
        }
        Ok(())
    }

    pub fn can_take_regular(&self) -> bool {
        self.verdict == Verdict::Pending
    }

    pub fn can_take_revision(&self) -> bool {
        self.can_take_revision_with(&self.rules)
    }

    pub(crate) fn can_take_revision_with(&self, rules: &GradingRules) -> bool {
        self.verdict == Verdict::Pending && self.revision_attempts < rules.max_revision_attempts
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn rules(&self) -> &GradingRules {
        &self.rules
    }

    pub fn regular_scores(&self) -> &[f64] {
        &self.regular_scores
    }

    pub fn revision_scores(&self) -> &[f64] {
        &self.revision_scores
    }

    pub fn regular_attempts(&self) -> u32 {
        self.regular_attempts
    }

    pub fn revision_attempts(&self) -> u32 {
        self.revision_attempts
    }

    /// Mean regular score, or 0.0 with no attempts.
    pub fn average_regular_score(&self) -> f64 {
        mean(&self.regular_scores)
    }

    /// Mean revision score, or 0.0 with no attempts.
    pub fn average_revision_score(&self) -> f64 {
        mean(&self.revision_scores)
    }

    /// Plain-data copy for a presentation layer.
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            verdict: self.verdict,
            regular_attempts: self.regular_attempts,
            revision_attempts: self.revision_attempts,
            regular_scores: self.regular_scores.clone(),
            revision_scores: self.revision_scores.clone(),
        }
    }

    fn set_verdict(&mut self, verdict: Verdict) {
        tracing::info!(
            from = %self.verdict,
            to = %verdict,
            regular_attempts = self.regular_attempts,
            revision_attempts = self.revision_attempts,
            "verdict changed"
        );
        self.verdict = verdict;
    }
}

/// Serializable view of a student's statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub verdict: Verdict,
    pub regular_attempts: u32,
    pub revision_attempts: u32,
    pub regular_scores: Vec<f64>,
    pub revision_scores: Vec<f64>,
}

fn check_score(score: f64) -> crate::Result<()> {
    if (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(QuizError::invalid(format!(
            "score must be between 0 and 1, got {score}"
        )))
    }
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}
