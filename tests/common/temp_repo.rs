//! Real git repositories for end-to-end tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A bare "remote" plus a seed clone used to publish branches to it
///
/// Layout under one temp dir:
/// - `remote.git`: bare repository standing in for GitHub
/// - `seed`: clone used to create `main` and PR head branches
/// - `work`: clone handed to the merge run (see [`Self::clone_work`])
pub struct TempGitRepo {
    dir: TempDir,
}

impl TempGitRepo {
    /// Create the remote with a `main` branch holding `README.md`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let repo = Self { dir };

        git(repo.dir.path(), &["init", "--bare", "-q", "remote.git"]);
        git(&repo.remote(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(repo.dir.path(), &["clone", "-q", "remote.git", "seed"]);

        let seed = repo.seed();
        git(&seed, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.commit_file("README.md", "integration test\n", "initial commit");
        git(&seed, &["push", "-q", "origin", "main"]);
        repo
    }

    /// Path of the bare remote
    pub fn remote(&self) -> PathBuf {
        self.dir.path().join("remote.git")
    }

    fn seed(&self) -> PathBuf {
        self.dir.path().join("seed")
    }

    fn commit_file(&self, file: &str, content: &str, message: &str) {
        let seed = self.seed();
        fs::write(seed.join(file), content).expect("write file");
        git(&seed, &["add", file]);
        git(&seed, &["commit", "-q", "-m", message]);
    }

    /// Publish `branch`, forked from `main`, with one commit writing `file`
    pub fn push_branch(&self, branch: &str, file: &str, content: &str) {
        let seed = self.seed();
        git(&seed, &["checkout", "-q", "-B", branch, "main"]);
        self.commit_file(file, content, &format!("update {file} on {branch}"));
        git(&seed, &["push", "-q", "--force", "origin", branch]);
        git(&seed, &["checkout", "-q", "main"]);
    }

    /// Clone the remote into `work` and return its path
    pub fn clone_work(&self) -> PathBuf {
        git(self.dir.path(), &["clone", "-q", "remote.git", "work"]);
        self.dir.path().join("work")
    }

    /// Files on `branch` in the remote, sorted
    pub fn remote_files(&self, branch: &str) -> Vec<String> {
        let out = git(
            &self.remote(),
            &["ls-tree", "-r", "--name-only", branch],
        );
        let mut files: Vec<String> = out.lines().map(String::from).collect();
        files.sort();
        files
    }

    /// Content of `file` on `branch` in the remote
    pub fn remote_file(&self, branch: &str, file: &str) -> String {
        git(&self.remote(), &["show", &format!("{branch}:{file}")])
    }

    /// Whether `branch` exists in the remote
    pub fn remote_has_branch(&self, branch: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "-q", "--verify", &format!("refs/heads/{branch}")])
            .current_dir(self.remote())
            .output()
            .expect("run git")
            .status
            .success()
    }
}

/// Run git with a fixed test identity, panicking on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "author@example.com")
        .env("GIT_COMMITTER_NAME", "Test Author")
        .env("GIT_COMMITTER_EMAIL", "author@example.com")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}
