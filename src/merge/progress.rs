//! Progress reporting for merge runs

use crate::types::{MergeOutcome, PullRequest};
use async_trait::async_trait;

/// Phase of a merge run
///
/// A run moves strictly forward: `Init → BranchSetup → Merging → Teardown → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Nothing has touched the working copy yet
    Init,
    /// Configuring identity, fetching, creating the target branch
    BranchSetup,
    /// Merging PR head branches one by one
    Merging,
    /// Force-pushing the target branch
    Teardown,
    /// Run finished; report is ready
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::BranchSetup => write!(f, "branch setup"),
            Self::Merging => write!(f, "merging"),
            Self::Teardown => write!(f, "teardown"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Callback for progress updates during a merge run
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when the run enters a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called before the merge of `pr` (`index` is zero-based)
    async fn on_merge_started(&self, index: usize, total: usize, pr: &PullRequest);

    /// Called once a merge attempt has been recorded
    async fn on_merge_finished(&self, outcome: &MergeOutcome);

    /// Called for non-fatal problems worth surfacing to the operator
    async fn on_warning(&self, message: &str);

    /// Called for general status messages
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_merge_started(&self, _index: usize, _total: usize, _pr: &PullRequest) {}
    async fn on_merge_finished(&self, _outcome: &MergeOutcome) {}
    async fn on_warning(&self, _message: &str) {}
    async fn on_message(&self, _message: &str) {}
}
