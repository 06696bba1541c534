//! Merge execution - effectful operations
//!
//! This module takes a `MergePlan` (created by the pure planning functions)
//! and builds the integration branch through the `Vcs` trait. A failed merge
//! is rolled back and recorded; only setup, rollback and push failures stop
//! the run.

use crate::config::RunConfig;
use crate::error::{Error, Result, SetupStep};
use crate::git::{CommandError, Vcs};
use crate::merge::plan::MergePlan;
use crate::merge::progress::{Phase, ProgressCallback};
use crate::merge::report::MergeReport;
use crate::types::{CommitterIdentity, MergeOutcome, PullRequest};
use tracing::{debug, error, info, warn};

/// Branch settings for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchOptions {
    /// Branch the integration branch starts from
    pub base: String,
    /// Integration branch to create and force-push
    pub target: String,
    /// Identity used for merge commits
    pub identity: CommitterIdentity,
}

impl From<&RunConfig> for BranchOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            base: config.base.clone(),
            target: config.target.clone(),
            identity: config.identity.clone(),
        }
    }
}

/// Result of merging one PR head branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAttempt {
    /// The head branch merged cleanly
    Merged(PullRequest),
    /// The merge failed and was rolled back
    Conflicted {
        /// PR whose merge failed
        pull_request: PullRequest,
        /// Error output from git
        message: String,
    },
}

impl MergeAttempt {
    /// Whether the merge went through
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }

    /// The PR this attempt was for
    pub const fn pull_request(&self) -> &PullRequest {
        match self {
            Self::Merged(pr) | Self::Conflicted { pull_request: pr, .. } => pr,
        }
    }
}

impl From<MergeAttempt> for MergeOutcome {
    fn from(attempt: MergeAttempt) -> Self {
        match attempt {
            MergeAttempt::Merged(pr) => Self::merged(pr),
            MergeAttempt::Conflicted {
                pull_request,
                message,
            } => Self::failed(pull_request, message),
        }
    }
}

/// The integration branch, checked out and exclusively owned by one run
///
/// Created by [`setup_integration_branch`], fed PRs through
/// [`attempt_merge`](Self::attempt_merge) and consumed by
/// [`publish`](Self::publish).
pub struct IntegrationBranch<'a> {
    vcs: &'a mut dyn Vcs,
    target: String,
}

impl std::fmt::Debug for IntegrationBranch<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationBranch")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl IntegrationBranch<'_> {
    /// Name of the integration branch
    pub fn name(&self) -> &str {
        &self.target
    }

    /// Merge the PR's remote head branch into the integration branch
    ///
    /// A failed merge is rolled back and returned as
    /// [`MergeAttempt::Conflicted`]. The only error is a failed rollback,
    /// which leaves the working copy unusable for further merges.
    pub async fn attempt_merge(&mut self, pr: &PullRequest) -> Result<MergeAttempt> {
        debug!(pr_number = pr.number, head_ref = %pr.head_ref, "merging PR");

        match self.vcs.merge_remote_branch(&pr.head_ref).await {
            Ok(()) => {
                debug!(pr_number = pr.number, "merged PR");
                Ok(MergeAttempt::Merged(pr.clone()))
            }
            Err(merge_error) => {
                warn!(pr_number = pr.number, error = %merge_error, "merge failed, rolling back");
                self.roll_back(pr.number).await?;
                Ok(MergeAttempt::Conflicted {
                    pull_request: pr.clone(),
                    message: merge_error.message,
                })
            }
        }
    }

    async fn roll_back(&mut self, pr_number: u64) -> Result<()> {
        let abort_error = |source: CommandError| {
            error!(pr_number, error = %source, "failed to abort merge");
            Error::MergeAbort { pr_number, source }
        };

        // A merge that never started (e.g. missing remote branch) has nothing to abort
        if self.vcs.is_merging().await.map_err(abort_error)? {
            self.vcs.abort_merge().await.map_err(abort_error)?;
            debug!(pr_number, "aborted merge");
        }
        Ok(())
    }

    /// Force-push the integration branch, ending the run
    pub async fn publish(self) -> Result<()> {
        debug!(branch = %self.target, "force-pushing integration branch");
        self.vcs
            .force_push(&self.target)
            .await
            .map_err(Error::Push)
    }
}

/// Prepare the integration branch (EFFECTFUL)
///
/// Sets the committer identity, fetches, fast-forwards the base branch and
/// creates the target branch from it. Any failure is fatal.
pub async fn setup_integration_branch<'a>(
    vcs: &'a mut dyn Vcs,
    options: &BranchOptions,
) -> Result<IntegrationBranch<'a>> {
    let setup_error = |step: SetupStep| move |source: CommandError| Error::Setup { step, source };

    vcs.configure_identity(&options.identity)
        .await
        .map_err(setup_error(SetupStep::ConfigureIdentity))?;
    vcs.fetch().await.map_err(setup_error(SetupStep::Fetch))?;
    vcs.checkout(&options.base)
        .await
        .map_err(setup_error(SetupStep::CheckoutBase))?;
    vcs.pull(&options.base)
        .await
        .map_err(setup_error(SetupStep::PullBase))?;
    vcs.create_branch(&options.target)
        .await
        .map_err(setup_error(SetupStep::CreateTarget))?;

    debug!(base = %options.base, branch = %options.target, "integration branch ready");
    Ok(IntegrationBranch {
        vcs,
        target: options.target.clone(),
    })
}

/// Execute the merge plan (EFFECTFUL)
///
/// Runs the whole state machine: branch setup, one merge attempt per plan
/// step in order, then force-push. Failed merges are rolled back and end up
/// in `MergeReport::failures`; they never stop the loop.
///
/// # Arguments
/// * `plan` - The merge plan to execute
/// * `vcs` - Working copy, owned by this run until it returns
/// * `options` - Base/target branches and committer identity
/// * `progress` - Progress callback for status updates
///
/// # Errors
/// `Error::Setup` if the branch cannot be prepared (nothing is merged or
/// pushed), `Error::MergeAbort` if a failed merge cannot be rolled back and
/// `Error::Push` if the final push fails.
pub async fn execute_merge(
    plan: &MergePlan,
    vcs: &mut dyn Vcs,
    options: &BranchOptions,
    progress: &dyn ProgressCallback,
) -> Result<MergeReport> {
    progress.on_phase(Phase::BranchSetup).await;
    info!(base = %options.base, branch = %options.target, "setting up integration branch");
    let mut branch = setup_integration_branch(vcs, options).await?;

    progress.on_phase(Phase::Merging).await;
    let mut report = MergeReport::new(branch.name());
    let total = plan.steps.len();
    if plan.is_empty() {
        progress
            .on_message(&format!(
                "no open PR is labeled {}; {} will match {}",
                plan.label_name, options.target, options.base
            ))
            .await;
    }

    for (index, step) in plan.steps.iter().enumerate() {
        let pr = &step.pull_request;

        if step.base_mismatch {
            let message = format!(
                "the base branch of PR #{} ({}) is {}, not {}",
                pr.number, pr.url, pr.base_ref, options.base
            );
            warn!(pr_number = pr.number, base_ref = %pr.base_ref, "PR targets a different base");
            progress.on_warning(&message).await;
        }

        progress.on_merge_started(index, total, pr).await;
        let attempt = branch.attempt_merge(pr).await?;
        let outcome = report.record(attempt);
        progress.on_merge_finished(outcome).await;
    }

    progress.on_phase(Phase::Teardown).await;
    info!(
        branch = %options.target,
        merged = report.successes.len(),
        failed = report.failures.len(),
        "pushing integration branch"
    );
    branch.publish().await?;

    progress.on_phase(Phase::Done).await;
    Ok(report)
}
