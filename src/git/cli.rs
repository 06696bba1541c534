//! `git` executable backend

use super::{CommandError, CommandResult, Vcs};
use crate::types::CommitterIdentity;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Runs `git` commands in a working copy
pub struct GitCli {
    repo_dir: PathBuf,
    remote: String,
    identity: Option<CommitterIdentity>,
}

impl GitCli {
    /// Create a runner for the working copy at `repo_dir`, using `remote`
    pub fn new(repo_dir: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            remote: remote.into(),
            identity: None,
        }
    }

    /// Working copy directory
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Remote name used for fetch, pull, merge and push
    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// URL of the configured remote
    pub async fn remote_url(&self) -> CommandResult<String> {
        self.run(&["remote", "get-url", &self.remote]).await
    }

    /// Root directory of the working copy
    pub async fn toplevel(&self) -> CommandResult<PathBuf> {
        self.run(&["rev-parse", "--show-toplevel"])
            .await
            .map(PathBuf::from)
    }

    fn remote_ref(&self, branch: &str) -> String {
        format!("{}/{branch}", self.remote)
    }

    async fn output(&self, args: &[&str]) -> CommandResult<Output> {
        let command_line = format_command(args);
        debug!(command = %command_line, "running git");

        let mut command = Command::new("git");
        if let Some(ref identity) = self.identity {
            command
                .arg("-c")
                .arg(format!("user.name={}", identity.name))
                .arg("-c")
                .arg(format!("user.email={}", identity.email));
        }

        command
            .args(args)
            .current_dir(&self.repo_dir)
            // Never block on a credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .await
            .map_err(|e| CommandError::new(command_line, None, format!("failed to run git: {e}")))
    }

    /// Run a command and return its trimmed stdout
    async fn run(&self, args: &[&str]) -> CommandResult<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(CommandError::new(
                format_command(args),
                output.status.code(),
                failure_message(&output.stdout, &output.stderr),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn format_command(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

/// Pick the useful part of a failed command's output
///
/// `git merge` reports conflicts on stdout and leaves stderr empty.
fn failure_message(stdout: &[u8], stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::from_utf8_lossy(stdout).trim().to_string()
    } else {
        stderr.to_string()
    }
}

#[async_trait]
impl Vcs for GitCli {
    async fn configure_identity(&mut self, identity: &CommitterIdentity) -> CommandResult {
        if identity.name.trim().is_empty() {
            return Err(CommandError::new(
                "git config user.name",
                None,
                "committer name is empty",
            ));
        }
        if identity.email.trim().is_empty() {
            return Err(CommandError::new(
                "git config user.email",
                None,
                "committer email is empty",
            ));
        }
        debug!(name = %identity.name, email = %identity.email, "using committer identity");
        self.identity = Some(identity.clone());
        Ok(())
    }

    async fn fetch(&mut self) -> CommandResult {
        self.run(&["fetch", &self.remote]).await.map(drop)
    }

    async fn checkout(&mut self, branch: &str) -> CommandResult {
        self.run(&["checkout", branch]).await.map(drop)
    }

    async fn pull(&mut self, branch: &str) -> CommandResult {
        self.run(&["pull", "--ff-only", &self.remote, branch])
            .await
            .map(drop)
    }

    async fn create_branch(&mut self, branch: &str) -> CommandResult {
        self.run(&["checkout", "-B", branch]).await.map(drop)
    }

    async fn merge_remote_branch(&mut self, branch: &str) -> CommandResult {
        let remote_ref = self.remote_ref(branch);
        self.run(&["merge", "--no-edit", &remote_ref]).await.map(drop)
    }

    async fn is_merging(&mut self) -> CommandResult<bool> {
        let args = ["rev-parse", "-q", "--verify", "MERGE_HEAD"];
        let output = self.output(&args).await?;
        match output.status.code() {
            Some(0) => Ok(true),
            // --verify -q exits 1 without output when the ref is missing
            Some(1) => Ok(false),
            code => Err(CommandError::new(
                format_command(&args),
                code,
                failure_message(&output.stdout, &output.stderr),
            )),
        }
    }

    async fn abort_merge(&mut self) -> CommandResult {
        self.run(&["merge", "--abort"]).await.map(drop)
    }

    async fn force_push(&mut self, branch: &str) -> CommandResult {
        self.run(&["push", "--force", &self.remote, branch])
            .await
            .map(drop)
    }
}
