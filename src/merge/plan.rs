//! Merge planning - pure functions for creating merge plans
//!
//! This module contains the pure, testable logic for deciding which PRs get
//! merged and in what order. No I/O happens here - all data is passed in.

use crate::types::PullRequest;

/// Options for merge planning
#[derive(Debug, Clone)]
pub struct MergePlanOptions {
    /// Only PRs carrying this label are merged (case-sensitive)
    pub label_name: String,
    /// Base branch the integration branch starts from
    pub base: String,
}

/// A single merge in the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStep {
    /// PR whose head branch gets merged
    pub pull_request: PullRequest,
    /// The PR targets a different base than the integration branch
    ///
    /// Advisory only: the merge is still attempted.
    pub base_mismatch: bool,
}

impl MergeStep {
    /// PR number for this step
    pub const fn pr_number(&self) -> u64 {
        self.pull_request.number
    }
}

impl std::fmt::Display for MergeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pr = &self.pull_request;
        write!(f, "merge PR #{}: {} ({})", pr.number, pr.title, pr.head_ref)?;
        if self.base_mismatch {
            write!(f, " [based on {}]", pr.base_ref)?;
        }
        Ok(())
    }
}

/// Merge plan - the functional core output
///
/// Created by `create_merge_plan()` (pure) and executed by
/// `execute_merge()` (effectful).
#[derive(Debug, Clone)]
pub struct MergePlan {
    /// Label the plan was built for
    pub label_name: String,
    /// Base branch the integration branch starts from
    pub base: String,
    /// Merges in execution order
    pub steps: Vec<MergeStep>,
}

impl MergePlan {
    /// Check if the plan has no merges
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of planned merges
    #[must_use]
    pub fn merge_count(&self) -> usize {
        self.steps.len()
    }

    /// Number of PRs authored against a different base
    #[must_use]
    pub fn base_mismatch_count(&self) -> usize {
        self.steps.iter().filter(|s| s.base_mismatch).count()
    }
}

/// Select PRs carrying `label_name`, oldest first
///
/// The sort is stable: PRs created at the same instant keep their
/// retrieval order. PR numbers never influence the order.
#[must_use]
pub fn select_labeled_prs(prs: &[PullRequest], label_name: &str) -> Vec<PullRequest> {
    let mut selected: Vec<PullRequest> = prs
        .iter()
        .filter(|pr| pr.has_label(label_name))
        .cloned()
        .collect();
    selected.sort_by_key(|pr| pr.created_at);
    selected
}

/// Create a merge plan (PURE - no I/O, easily testable)
///
/// # Arguments
/// * `prs` - Every open PR of the repository, in retrieval order
/// * `options` - Label and base branch for this run
///
/// # Returns
/// A `MergePlan` listing the merges to attempt, in order
#[must_use]
pub fn create_merge_plan(prs: &[PullRequest], options: &MergePlanOptions) -> MergePlan {
    let steps = select_labeled_prs(prs, &options.label_name)
        .into_iter()
        .map(|pr| MergeStep {
            base_mismatch: pr.base_ref != options.base,
            pull_request: pr,
        })
        .collect();

    MergePlan {
        label_name: options.label_name.clone(),
        base: options.base.clone(),
        steps,
    }
}
