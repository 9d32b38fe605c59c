//! Grading rules and quiz policy configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Thresholds that drive the verdict state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradingRules {
    /// Minimum score (inclusive) that yields a PASS.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f64,
    /// Failed regular attempts after which the verdict becomes FAIL.
    #[serde(default = "default_max_regular_attempts")]
    pub max_regular_attempts: u32,
    /// Revision attempts allowed per student.
    #[serde(default = "default_max_revision_attempts")]
    pub max_revision_attempts: u32,
}

fn default_pass_threshold() -> f64 {
    0.5
}
fn default_max_regular_attempts() -> u32 {
    2
}
fn default_max_revision_attempts() -> u32 {
    2
}

impl Default for GradingRules {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            max_regular_attempts: default_max_regular_attempts(),
            max_revision_attempts: default_max_revision_attempts(),
        }
    }
}

impl GradingRules {
    /// Check that the thresholds describe a usable state machine.
    ///
    /// The threshold must lie in (0, 1] (NaN is rejected) and both attempt
    /// caps must be at least 1.
    pub fn validate(&self) -> crate::Result<()> {
        let threshold = self.pass_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(QuizError::invalid(format!(
                "pass_threshold must be in (0, 1], got {threshold}"
            )));
        }
        if self.max_regular_attempts == 0 {
            return Err(QuizError::invalid("max_regular_attempts must be at least 1"));
        }
        if self.max_revision_attempts == 0 {
            return Err(QuizError::invalid(
                "max_revision_attempts must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Whether regular quizzes may repeat questions a student has already seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegularHistoryPolicy {
    /// Draw from the whole pool on every attempt.
    #[default]
    AllowRepeats,
    /// Draw only from questions absent from the student's history.
    ExcludeSeen,
}

/// Top-level quizgate configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizPolicy {
    #[serde(default)]
    pub grading: GradingRules,
    #[serde(default)]
    pub regular_history: RegularHistoryPolicy,
    /// Fixed RNG seed for reproducible question selection.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl QuizPolicy {
    pub fn validate(&self) -> crate::Result<()> {
        self.grading.validate()
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizgate.toml` in the current directory
/// 2. `~/.config/quizgate/config.toml`
///
/// Environment variable overrides: `QUIZGATE_SEED`, `QUIZGATE_PASS_THRESHOLD`.
pub fn load_policy() -> Result<QuizPolicy> {
    load_policy_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_policy_from(path: Option<&Path>) -> Result<QuizPolicy> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => first_existing([
            Some(PathBuf::from("quizgate.toml")),
            dirs_path().map(|home| home.join("config.toml")),
        ]),
    };

    let mut policy = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_policy_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizPolicy::default(),
    };

    apply_env_overrides(&mut policy)?;
    policy.validate()?;
    tracing::debug!(?policy, "loaded quiz policy");
    Ok(policy)
}

fn apply_env_overrides(policy: &mut QuizPolicy) -> Result<()> {
    if let Ok(seed) = std::env::var("QUIZGATE_SEED") {
        policy.seed = Some(
            seed.trim()
                .parse()
                .with_context(|| format!("QUIZGATE_SEED is not a u64: {seed}"))?,
        );
    }
    if let Ok(threshold) = std::env::var("QUIZGATE_PASS_THRESHOLD") {
        policy.grading.pass_threshold = threshold
            .trim()
            .parse()
            .with_context(|| format!("QUIZGATE_PASS_THRESHOLD is not a number: {threshold}"))?;
    }
    Ok(())
}

/// First candidate that exists on disk, in order.
fn first_existing(candidates: impl IntoIterator<Item = Option<PathBuf>>) -> Option<PathBuf> {
    candidates.into_iter().flatten().find(|p| p.exists())
}

/// Parse and validate a policy from TOML text.
pub fn parse_policy_str(content: &str) -> Result<QuizPolicy> {
    let policy: QuizPolicy = toml::from_str(content).context("failed to parse TOML")?;
    policy.validate()?;
    Ok(policy)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgate"))
}
