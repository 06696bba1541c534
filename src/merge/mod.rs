//! Merge engine for labeled PRs
//!
//! Three-phase pattern:
//! 1. Gather - fetch all open PRs (effectful, see `platform`)
//! 2. Plan - filter by label and order by creation time (pure, testable)
//! 3. Execute - build the integration branch and push it (effectful)

mod execute;
mod plan;
mod progress;
mod report;

pub use execute::{
    BranchOptions, IntegrationBranch, MergeAttempt, execute_merge, setup_integration_branch,
};
pub use plan::{MergePlan, MergePlanOptions, MergeStep, create_merge_plan, select_labeled_prs};
pub use progress::{NoopProgress, Phase, ProgressCallback};
pub use report::MergeReport;
