//! Shared test fixtures

#![allow(dead_code)]

mod mock_query;
mod mock_vcs;
mod temp_repo;

pub use mock_query::{FetchPageCall, MockQueryService};
pub use mock_vcs::{MockVcs, VcsCall, VcsOp};
pub use temp_repo::{TempGitRepo, git};

use chrono::{DateTime, Utc};
use label_merger::merge::BranchOptions;
use label_merger::types::{CommitterIdentity, PullRequest};

/// Label used by most tests
pub const LABEL: &str = "merge-me";

/// Build an open PR against `main` with head branch `pr-<number>`
///
/// `created_at` is an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
pub fn make_pr(number: u64, created_at: &str, labels: &[&str]) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {number}"),
        url: format!("https://github.com/acme/widgets/pull/{number}"),
        base_ref: "main".to_string(),
        head_ref: format!("pr-{number}"),
        created_at: timestamp(created_at),
        labels: labels.iter().map(ToString::to_string).collect(),
    }
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC)
pub fn timestamp(value: &str) -> DateTime<Utc> {
    let full = if value.contains('T') {
        value.to_string()
    } else {
        format!("{value}T00:00:00Z")
    };
    full.parse().expect("valid timestamp")
}

pub fn bot_identity() -> CommitterIdentity {
    CommitterIdentity {
        name: "github-actions[bot]".to_string(),
        email: "41898282+github-actions[bot]@users.noreply.github.com".to_string(),
    }
}

/// `main` -> `integration`, committed by the bot
pub fn branch_options() -> BranchOptions {
    BranchOptions {
        base: "main".to_string(),
        target: "integration".to_string(),
        identity: bot_identity(),
    }
}
