//! Shared setup for a merge run
//!
//! Resolves everything a run needs before the working copy is touched.

use crate::cli::style::Stylize;
use anstream::println;
use label_merger::auth::{get_github_auth, test_github_auth};
use label_merger::config::{DEFAULT_REMOTE, FileConfig, RunConfig, find_config};
use label_merger::error::Result;
use label_merger::git::GitCli;
use label_merger::platform::{
    GitHubQueryService, PullRequestService, parse_repo_info, resolve_repo,
};
use label_merger::types::PlatformConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything resolved before a run starts
///
/// This performs the common setup:
/// - Locate the working copy root
/// - Load and merge configuration layers
/// - Detect the repository
/// - Resolve and check the GitHub token
pub struct CommandContext {
    /// Git runner for the working copy
    pub git: GitCli,
    /// Root path of the working copy
    pub workspace_root: PathBuf,
    /// Resolved run settings
    pub config: RunConfig,
    /// Repository on GitHub
    pub platform: PlatformConfig,
    /// Pull request listing for the repository
    pub pull_requests: PullRequestService,
}

impl CommandContext {
    /// Create a new command context
    pub async fn new(
        path: &Path,
        config_path: Option<&Path>,
        overrides: FileConfig,
        token: Option<&str>,
    ) -> Result<Self> {
        // Locate working copy root
        let workspace_root = GitCli::new(path, DEFAULT_REMOTE).toplevel().await?;
        debug!(root = %workspace_root.display(), "found working copy");

        // Flags and env win over the config file
        let file_config = find_config(config_path, &workspace_root)?;
        let config = RunConfig::resolve(overrides.or(file_config))?;

        let git = GitCli::new(&workspace_root, config.remote.clone());

        // Detect repository
        let platform = match config.repo {
            Some(ref slug) => resolve_repo(slug, config.host.as_deref())?,
            None => {
                let url = git.remote_url().await?;
                let mut detected = parse_repo_info(&url)?;
                if config.host.is_some() {
                    detected.host.clone_from(&config.host);
                }
                detected
            }
        };

        // Resolve token and make sure it works before touching anything
        let auth = get_github_auth(token).await?;
        let login = test_github_auth(&auth, platform.host.as_deref()).await?;
        println!(
            "{}",
            format!("Authenticated as {login} (token from {})", auth.source).muted()
        );

        let query = GitHubQueryService::new(
            &auth.token,
            platform.owner.clone(),
            platform.repo.clone(),
            platform.host.clone(),
        )?;
        let pull_requests = PullRequestService::new(
            Box::new(query),
            platform.owner.clone(),
            platform.repo.clone(),
        );

        Ok(Self {
            git,
            workspace_root,
            config,
            platform,
            pull_requests,
        })
    }
}
