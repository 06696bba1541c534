//! Merge run results

use crate::error::{Error, Result};
use crate::merge::execute::MergeAttempt;
use crate::types::MergeOutcome;

/// Successes and failures of one merge run, each in merge order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Integration branch the PRs were merged into
    pub target: String,
    /// PRs that merged cleanly
    pub successes: Vec<MergeOutcome>,
    /// PRs whose merge failed and was rolled back
    pub failures: Vec<MergeOutcome>,
}

impl MergeReport {
    /// Create an empty report for `target`
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Fold a sequence of attempts into a report
    pub fn from_attempts(
        target: impl Into<String>,
        attempts: impl IntoIterator<Item = MergeAttempt>,
    ) -> Self {
        attempts
            .into_iter()
            .fold(Self::new(target), |mut report, attempt| {
                report.record(attempt);
                report
            })
    }

    /// Record an attempt in exactly one of the two lists
    pub fn record(&mut self, attempt: MergeAttempt) -> &MergeOutcome {
        let list = if attempt.is_merged() {
            &mut self.successes
        } else {
            &mut self.failures
        };
        list.push(attempt.into());
        &list[list.len() - 1]
    }

    /// Check if every attempted merge succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of merges attempted
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Signal the run's overall result
    ///
    /// # Errors
    /// `Error::MergeFailures` carrying the failed PRs when any merge failed.
    pub fn check(&self) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(Error::MergeFailures {
            count: self.failures.len(),
            failures: self
                .failures
                .iter()
                .map(|o| o.pull_request.clone())
                .collect(),
        })
    }
}

impl std::fmt::Display for MergeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}: {} merged, {} failed",
            self.target,
            self.successes.len(),
            self.failures.len()
        )?;
        for outcome in &self.successes {
            writeln!(f, "  merged {}", outcome.pull_request)?;
        }
        for outcome in &self.failures {
            writeln!(f, "  failed {}", outcome.pull_request)?;
        }
        Ok(())
    }
}
