//! label-merger CLI - merge labeled pull requests into an integration branch

mod cli;

use clap::Parser;
use label_merger::config::FileConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Merge every open pull request carrying a label into a fresh integration branch
#[derive(Parser)]
#[command(name = "label-merger")]
#[command(about = "Merge labeled pull requests into an integration branch")]
#[command(version)]
struct Cli {
    /// GitHub token (defaults to GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
    #[arg(long)]
    token: Option<String>,

    /// Repository as owner/repo (defaults to the git remote's URL)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: Option<String>,

    /// GitHub Enterprise host
    #[arg(long)]
    host: Option<String>,

    /// Base branch the integration branch starts from [default: main]
    #[arg(long, env = "LABEL_MERGER_BASE")]
    base: Option<String>,

    /// Integration branch to create and force-push
    #[arg(long, env = "LABEL_MERGER_TARGET")]
    target: Option<String>,

    /// Merge only PRs carrying this label (exact match)
    #[arg(long = "label-name", env = "LABEL_MERGER_LABEL")]
    label_name: Option<String>,

    /// Committer email for merge commits
    #[arg(long, env = "LABEL_MERGER_EMAIL")]
    email: Option<String>,

    /// Committer name for merge commits
    #[arg(long, env = "LABEL_MERGER_NAME")]
    name: Option<String>,

    /// Git remote to fetch from and push to [default: origin]
    #[arg(long, env = "LABEL_MERGER_REMOTE")]
    remote: Option<String>,

    /// Path to the working copy
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Config file (defaults to label-merger.toml in the working copy)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show the merge plan without touching the working copy
    #[arg(long)]
    dry_run: bool,

    /// Show the merge plan and ask before executing
    #[arg(long, conflicts_with = "dry_run")]
    confirm: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            base: self.base.clone(),
            target: self.target.clone(),
            label_name: self.label_name.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            remote: self.remote.clone(),
            repo: self.repo.clone(),
            host: self.host.clone(),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "label_merger=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = cli::MergeOptions {
        dry_run: cli.dry_run,
        confirm: cli.confirm,
    };

    let result = cli::run_merge(
        &cli.path,
        cli.config.as_deref(),
        cli.overrides(),
        cli.token.as_deref(),
        options,
    )
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            cli::report::print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}
