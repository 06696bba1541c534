//! Version control operations used by a merge run
//!
//! The orchestrator only talks to the [`Vcs`] trait so the run can be driven
//! against a mock in tests. [`GitCli`] implements it by shelling out to `git`.

mod cli;

pub use cli::GitCli;

use crate::types::CommitterIdentity;
use async_trait::async_trait;
use thiserror::Error;

/// A failed version control command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "`{command}` failed{}: {message}",
    .status.map(|code| format!(" (exit code {code})")).unwrap_or_default()
)]
pub struct CommandError {
    /// Command line that was run, without identity overrides
    pub command: String,
    /// Exit code, if the process ran to completion
    pub status: Option<i32>,
    /// Trimmed error output
    pub message: String,
}

impl CommandError {
    /// Create a new command error
    pub fn new(command: impl Into<String>, status: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            status,
            message: message.into(),
        }
    }
}

/// Result of a version control command
pub type CommandResult<T = ()> = std::result::Result<T, CommandError>;

/// Version control operations needed to build an integration branch
///
/// Every method takes `&mut self`: the working copy is owned exclusively by
/// one run and each command must finish before the next one starts.
/// Branch arguments are plain branch names; implementations resolve them
/// against their configured remote where a remote ref is meant.
#[async_trait]
pub trait Vcs: Send {
    /// Record the identity used for every commit made from now on
    async fn configure_identity(&mut self, identity: &CommitterIdentity) -> CommandResult;

    /// Fetch all refs from the remote
    async fn fetch(&mut self) -> CommandResult;

    /// Check out an existing branch
    async fn checkout(&mut self, branch: &str) -> CommandResult;

    /// Fast-forward the current branch to the remote `branch`
    async fn pull(&mut self, branch: &str) -> CommandResult;

    /// Create `branch` at the current commit and check it out
    ///
    /// An existing local branch of the same name is reset.
    async fn create_branch(&mut self, branch: &str) -> CommandResult;

    /// Merge the remote `branch` into the current branch
    async fn merge_remote_branch(&mut self, branch: &str) -> CommandResult;

    /// Whether a merge is in progress (conflicted and not yet concluded)
    async fn is_merging(&mut self) -> CommandResult<bool>;

    /// Abort the in-progress merge, restoring the pre-merge state
    async fn abort_merge(&mut self) -> CommandResult;

    /// Push `branch` to the remote, overwriting the remote branch
    async fn force_push(&mut self, branch: &str) -> CommandResult;
}
