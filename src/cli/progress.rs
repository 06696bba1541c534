//! Console progress output for merge runs

use crate::cli::report::annotation;
use crate::cli::style::{Stylize, WARN, check, cross};
use anstream::println;
use async_trait::async_trait;
use label_merger::merge::{Phase, ProgressCallback};
use label_merger::types::{MergeOutcome, PullRequest};

/// Progress callback printing one line per event
pub struct CliProgress {
    /// Also emit GitHub Actions workflow commands
    annotations: bool,
}

impl CliProgress {
    /// Create a progress printer
    pub const fn new(annotations: bool) -> Self {
        Self { annotations }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::BranchSetup => println!("{}", "Setting up integration branch...".muted()),
            Phase::Teardown => println!("{}", "Pushing integration branch...".muted()),
            Phase::Init | Phase::Merging | Phase::Done => {}
        }
    }

    async fn on_merge_started(&self, index: usize, total: usize, pr: &PullRequest) {
        println!(
            "{} Merging PR #{}: {} {}",
            format!("[{}/{total}]", index + 1).muted(),
            pr.number,
            pr.title,
            format!("({})", pr.head_ref).muted()
        );
    }

    async fn on_merge_finished(&self, outcome: &MergeOutcome) {
        if outcome.success {
            println!("  {} merged", check());
            return;
        }

        println!("  {} {}", cross(), "merge failed, rolled back".warn());
        if let Some(first_line) = outcome
            .error_message
            .as_deref()
            .and_then(|msg| msg.lines().next())
        {
            println!("    {}", first_line.muted());
        }
    }

    async fn on_warning(&self, message: &str) {
        println!("{} {}", WARN.warn(), message.warn());
        if self.annotations {
            println!("{}", annotation("warning", message));
        }
    }

    async fn on_message(&self, message: &str) {
        println!("{}", message.muted());
    }
}
