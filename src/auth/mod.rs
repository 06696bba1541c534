//! Authentication for GitHub
//!
//! Supports an explicit token, environment variables and the `gh` CLI.

mod github;

pub use github::{GitHubAuthConfig, get_github_auth, test_github_auth, token_from_sources};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed on the command line
    Argument,
    /// Token from environment variable
    EnvVar,
    /// Token from CLI tool (gh)
    Cli,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Argument => write!(f, "--token"),
            Self::EnvVar => write!(f, "environment"),
            Self::Cli => write!(f, "gh CLI"),
        }
    }
}
