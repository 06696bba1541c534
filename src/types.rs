//! Core types for label-merger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An open pull request as returned by the hosting service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number, unique within a repository
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name (the branch that gets merged)
    pub head_ref: String,
    /// When the PR was opened; defines merge order
    pub created_at: DateTime<Utc>,
    /// Names of the labels attached to the PR
    pub labels: Vec<String>,
}

impl PullRequest {
    /// Check whether the PR carries `label` (case-sensitive exact match)
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

impl std::fmt::Display for PullRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} ({})", self.number, self.title, self.url)
    }
}

/// Outcome of one merge attempt
///
/// Created when the attempt finishes and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The PR that was merged (or not)
    pub pull_request: PullRequest,
    /// Whether the head branch merged cleanly
    pub success: bool,
    /// Error output from git when the merge failed
    pub error_message: Option<String>,
}

impl MergeOutcome {
    /// Successful merge
    pub const fn merged(pull_request: PullRequest) -> Self {
        Self {
            pull_request,
            success: true,
            error_message: None,
        }
    }

    /// Failed (and rolled back) merge
    pub const fn failed(pull_request: PullRequest, error_message: String) -> Self {
        Self {
            pull_request,
            success: false,
            error_message: Some(error_message),
        }
    }
}

/// Committer identity used for merge commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitterIdentity {
    /// Committer name (`user.name`)
    pub name: String,
    /// Committer email (`user.email`)
    pub email: String,
}

/// Repository coordinates on the hosting service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl std::fmt::Display for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.host {
            Some(ref host) => write!(f, "{host}/{}/{}", self.owner, self.repo),
            None => write!(f, "{}/{}", self.owner, self.repo),
        }
    }
}
