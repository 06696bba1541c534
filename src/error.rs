//! Error types for label-merger

use crate::git::CommandError;
use crate::types::PullRequest;
use thiserror::Error;

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

/// Step of the branch setup phase, used to name what failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    /// Recording the committer identity
    ConfigureIdentity,
    /// Fetching from the remote
    Fetch,
    /// Checking out the base branch
    CheckoutBase,
    /// Fast-forwarding the base branch to the remote
    PullBase,
    /// Creating the target branch
    CreateTarget,
}

impl std::fmt::Display for SetupStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigureIdentity => write!(f, "configure committer identity"),
            Self::Fetch => write!(f, "fetch"),
            Self::CheckoutBase => write!(f, "checkout base branch"),
            Self::PullBase => write!(f, "pull base branch"),
            Self::CreateTarget => write!(f, "create target branch"),
        }
    }
}

/// Errors that can occur in label-merger
#[derive(Debug, Error)]
pub enum Error {
    /// Listing pull requests failed (transport, auth, pagination)
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Branch setup failed; nothing was merged or pushed
    #[error("branch setup failed ({step}): {source}")]
    Setup {
        /// Which setup step failed
        step: SetupStep,
        /// Underlying git failure
        #[source]
        source: CommandError,
    },

    /// Rolling back a failed merge failed; the working copy is not safe to reuse
    #[error("failed to abort merge of PR #{pr_number}: {source}")]
    MergeAbort {
        /// PR whose merge could not be rolled back
        pr_number: u64,
        /// Underlying git failure
        #[source]
        source: CommandError,
    },

    /// Force-pushing the target branch failed
    #[error("failed to push target branch: {0}")]
    Push(#[source] CommandError),

    /// One or more PRs failed to merge; the target branch was still pushed
    #[error("{count} pull request(s) failed to merge")]
    MergeFailures {
        /// Number of failed merges
        count: usize,
        /// PRs that failed, in merge order
        failures: Vec<PullRequest>,
    },

    /// Authentication error
    #[error("authentication error: {0}")]
    Auth(String),

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Repository could not be determined
    #[error("could not determine repository: {0}")]
    RepoNotFound(String),

    /// Git command failed outside the merge run (e.g. reading a remote URL)
    #[error("git error: {0}")]
    Git(#[from] CommandError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Process exit code for this error
    ///
    /// Failed merges exit with 1 (the target branch exists); every fatal
    /// error exits with 2.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::MergeFailures { .. } => 1,
            _ => 2,
        }
    }

    /// Whether the run stopped before producing a target branch
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::MergeFailures { .. })
    }
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        Self::GitHubApi(e.to_string())
    }
}
