//! Run command - merge labeled PRs into the integration branch

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::report::{github_actions, print_merge_report};
use crate::cli::style::{Stylize, WARN, arrow, check, spinner_style};
use anstream::println;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use label_merger::config::FileConfig;
use label_merger::error::{Error, Result};
use label_merger::merge::{
    BranchOptions, MergePlan, MergePlanOptions, create_merge_plan, execute_merge,
};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Dry run - show what would be merged without touching the working copy
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before executing
    pub confirm: bool,
}

/// Run the merge command
pub async fn run_merge(
    path: &Path,
    config_path: Option<&Path>,
    overrides: FileConfig,
    token: Option<&str>,
    options: MergeOptions,
) -> Result<()> {
    // =========================================================================
    // Phase 1: GATHER - Collect all data upfront
    // =========================================================================

    let mut ctx = CommandContext::new(path, config_path, overrides, token).await?;
    debug!(root = %ctx.workspace_root.display(), "context ready");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Fetching open PRs for {}...",
        ctx.platform.to_string().emphasis()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let prs = match ctx.pull_requests.get_all_prs().await {
        Ok(prs) => prs,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };

    spinner.finish_with_message(format!(
        "{} Found {} open PR(s) in {}",
        check(),
        prs.len().accent(),
        ctx.platform.to_string().emphasis()
    ));

    // =========================================================================
    // Phase 2: PLAN - Pure function, easily testable
    // =========================================================================

    let plan_options = MergePlanOptions {
        label_name: ctx.config.label_name.clone(),
        base: ctx.config.base.clone(),
    };
    let plan = create_merge_plan(&prs, &plan_options);

    println!(
        "{} PR(s) labeled {}",
        plan.merge_count().accent(),
        plan.label_name.emphasis()
    );

    if options.dry_run {
        report_merge_dry_run(&plan, &ctx.config.target, true);
        return Ok(());
    }

    if options.confirm {
        report_merge_dry_run(&plan, &ctx.config.target, false);
        if !Confirm::new()
            .with_prompt("Proceed with merge?")
            .default(true)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
        println!();
    }

    // =========================================================================
    // Phase 3: EXECUTE - Effectful operations
    // =========================================================================

    let annotations = github_actions();
    let progress = CliProgress::new(annotations);
    let branch_options = BranchOptions::from(&ctx.config);

    let report = execute_merge(&plan, &mut ctx.git, &branch_options, &progress).await?;

    print_merge_report(&report, annotations);
    report.check()
}

/// Report what would be merged (dry run)
fn report_merge_dry_run(plan: &MergePlan, target: &str, dry_run: bool) {
    println!();
    println!(
        "{} {} {} {}:",
        "Merge plan".emphasis(),
        plan.base.accent(),
        arrow(),
        target.accent()
    );
    println!();

    if plan.is_empty() {
        println!("  {}", "No PRs to merge; target would equal base".muted());
        println!();
        return;
    }

    for (index, step) in plan.steps.iter().enumerate() {
        let pr = &step.pull_request;
        println!("  {}. PR #{}: {}", index + 1, pr.number, pr.title);
        println!(
            "     {} {}",
            "Branch:".muted(),
            pr.head_ref.accent()
        );
        if step.base_mismatch {
            println!(
                "     {} based on {}, not {}",
                WARN.warn(),
                pr.base_ref.warn(),
                plan.base
            );
        }
    }

    println!();
    if plan.base_mismatch_count() > 0 {
        println!(
            "{}",
            format!(
                "{} PR(s) target a different base; they will still be merged.",
                plan.base_mismatch_count()
            )
            .muted()
        );
    }
    if dry_run {
        println!("{}", "Run without --dry-run to execute.".muted());
    }
}
