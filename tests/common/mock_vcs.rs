//! Mock working copy for testing the merge run

#![allow(dead_code)]

use async_trait::async_trait;
use label_merger::git::{CommandError, CommandResult, Vcs};
use label_merger::types::CommitterIdentity;
use std::collections::{HashMap, HashSet};

/// One call made against the mock, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    ConfigureIdentity(CommitterIdentity),
    Fetch,
    Checkout(String),
    Pull(String),
    CreateBranch(String),
    Merge(String),
    IsMerging,
    AbortMerge,
    ForcePush(String),
}

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsOp {
    ConfigureIdentity,
    Fetch,
    Checkout,
    Pull,
    CreateBranch,
    IsMerging,
    AbortMerge,
    ForcePush,
}

/// In-memory working copy
///
/// Keeps just enough state to check the branch contents: the head branches
/// merged onto the current branch, whether a merge is in progress and what
/// was pushed.
///
/// Features:
/// - Call tracking for verification
/// - Conflicts per head branch (merge stops half-way, like git)
/// - Missing head branches (merge fails before starting)
/// - Error injection per operation
#[derive(Debug, Default)]
pub struct MockVcs {
    calls: Vec<VcsCall>,
    conflicting: HashSet<String>,
    missing: HashSet<String>,
    errors: HashMap<VcsOp, String>,
    current_branch: Option<String>,
    merged: Vec<String>,
    merging: bool,
    identity: Option<CommitterIdentity>,
    pushed: Option<(String, Vec<String>)>,
}

impl MockVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merging `branch` conflicts and leaves the merge in progress
    pub fn conflict_on(&mut self, branch: &str) -> &mut Self {
        self.conflicting.insert(branch.to_string());
        self
    }

    /// `branch` does not exist on the remote
    pub fn missing_branch(&mut self, branch: &str) -> &mut Self {
        self.missing.insert(branch.to_string());
        self
    }

    /// Make `op` fail with `message`
    pub fn fail(&mut self, op: VcsOp, message: &str) -> &mut Self {
        self.errors.insert(op, message.to_string());
        self
    }

    pub fn calls(&self) -> &[VcsCall] {
        &self.calls
    }

    /// Head branches merged onto the current branch, in merge order
    pub fn merged(&self) -> &[String] {
        &self.merged
    }

    /// Branch and merged heads at push time
    pub fn pushed(&self) -> Option<&(String, Vec<String>)> {
        self.pushed.as_ref()
    }

    pub const fn is_mid_merge(&self) -> bool {
        self.merging
    }

    pub fn abort_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == VcsCall::AbortMerge)
            .count()
    }

    /// Branches passed to `merge_remote_branch`, in call order
    pub fn merge_calls(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                VcsCall::Merge(branch) => Some(branch.clone()),
                _ => None,
            })
            .collect()
    }

    fn check(&self, op: VcsOp, command: &str) -> CommandResult {
        match self.errors.get(&op) {
            Some(msg) => Err(CommandError::new(command, Some(128), msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Vcs for MockVcs {
    async fn configure_identity(&mut self, identity: &CommitterIdentity) -> CommandResult {
        self.calls.push(VcsCall::ConfigureIdentity(identity.clone()));
        self.check(VcsOp::ConfigureIdentity, "git config user.name")?;
        self.identity = Some(identity.clone());
        Ok(())
    }

    async fn fetch(&mut self) -> CommandResult {
        self.calls.push(VcsCall::Fetch);
        self.check(VcsOp::Fetch, "git fetch origin")
    }

    async fn checkout(&mut self, branch: &str) -> CommandResult {
        self.calls.push(VcsCall::Checkout(branch.to_string()));
        self.check(VcsOp::Checkout, &format!("git checkout {branch}"))?;
        self.current_branch = Some(branch.to_string());
        self.merged.clear();
        Ok(())
    }

    async fn pull(&mut self, branch: &str) -> CommandResult {
        self.calls.push(VcsCall::Pull(branch.to_string()));
        self.check(VcsOp::Pull, &format!("git pull --ff-only origin {branch}"))
    }

    async fn create_branch(&mut self, branch: &str) -> CommandResult {
        self.calls.push(VcsCall::CreateBranch(branch.to_string()));
        self.check(VcsOp::CreateBranch, &format!("git checkout -B {branch}"))?;
        // New branch starts at the current commit
        self.current_branch = Some(branch.to_string());
        Ok(())
    }

    async fn merge_remote_branch(&mut self, branch: &str) -> CommandResult {
        self.calls.push(VcsCall::Merge(branch.to_string()));
        let command = format!("git merge --no-edit origin/{branch}");

        if self.merging {
            return Err(CommandError::new(
                command,
                Some(128),
                "fatal: You have not concluded your merge (MERGE_HEAD exists).",
            ));
        }
        if self.missing.contains(branch) {
            return Err(CommandError::new(
                command,
                Some(1),
                format!("merge: origin/{branch} - not something we can merge"),
            ));
        }
        if self.conflicting.contains(branch) {
            self.merging = true;
            return Err(CommandError::new(
                command,
                Some(1),
                "CONFLICT (content): Merge conflict in src/lib.rs\n\
                 Automatic merge failed; fix conflicts and then commit the result.",
            ));
        }

        self.merged.push(branch.to_string());
        Ok(())
    }

    async fn is_merging(&mut self) -> CommandResult<bool> {
        self.calls.push(VcsCall::IsMerging);
        self.check(VcsOp::IsMerging, "git rev-parse -q --verify MERGE_HEAD")?;
        Ok(self.merging)
    }

    async fn abort_merge(&mut self) -> CommandResult {
        self.calls.push(VcsCall::AbortMerge);
        self.check(VcsOp::AbortMerge, "git merge --abort")?;
        self.merging = false;
        Ok(())
    }

    async fn force_push(&mut self, branch: &str) -> CommandResult {
        self.calls.push(VcsCall::ForcePush(branch.to_string()));
        self.check(VcsOp::ForcePush, &format!("git push --force origin {branch}"))?;
        self.pushed = Some((branch.to_string(), self.merged.clone()));
        Ok(())
    }
}
