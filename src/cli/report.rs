//! Rendering of merge results for the operator

use crate::cli::style::{CHECK, CROSS, Stylize};
use anstream::{eprintln, println};
use label_merger::error::Error;
use label_merger::merge::MergeReport;
use label_merger::types::MergeOutcome;
use supports_hyperlinks::Stream;
use terminal_link::Link;

/// Whether we run inside GitHub Actions
pub fn github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Format a GitHub Actions workflow command (`::error::message`)
pub fn annotation(kind: &str, message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::{kind}::{escaped}")
}

/// `#123`, as a terminal hyperlink where supported
fn pr_reference(number: u64, url: &str) -> String {
    let text = format!("#{number}");
    if supports_hyperlinks::on(Stream::Stdout) {
        Link::new(&text, url).to_string()
    } else {
        text
    }
}

fn outcome_line(outcome: &MergeOutcome) -> String {
    let pr = &outcome.pull_request;
    format!(
        "{} {} {}",
        pr_reference(pr.number, &pr.url),
        pr.title,
        pr.url.muted()
    )
}

/// Print the success and failure lists of a run
pub fn print_merge_report(report: &MergeReport, annotations: bool) {
    println!();
    if report.successes.is_empty() {
        println!("{}", "No pull requests were merged.".muted());
    } else {
        println!(
            "{} {} into {}:",
            format!("{CHECK} Merged").success(),
            format!("{} PR(s)", report.successes.len()).accent(),
            report.target.emphasis()
        );
        for outcome in &report.successes {
            println!("   {}", outcome_line(outcome));
        }
    }

    if report.failures.is_empty() {
        return;
    }

    eprintln!();
    eprintln!(
        "{} {}",
        format!("{CROSS} Failed to merge").error(),
        format!("{} PR(s):", report.failures.len()).error()
    );
    for outcome in &report.failures {
        eprintln!("   {}", outcome_line(outcome));
        if let Some(ref msg) = outcome.error_message {
            for line in msg.lines().take(5) {
                eprintln!("      {}", line.muted());
            }
        }
        if annotations {
            let pr = &outcome.pull_request;
            println!(
                "{}",
                annotation("error", &format!("#{} PR ({}) merge failed", pr.number, pr.url))
            );
        }
    }
}

/// Print a run-ending error
pub fn print_error(error: &Error) {
    match error {
        Error::MergeFailures { count, .. } => {
            eprintln!();
            eprintln!(
                "{}",
                format!("{count} pull request(s) need manual merging; the integration branch was pushed without them.")
                    .error()
            );
        }
        other => {
            eprintln!("{} {other}", "Error:".error());
        }
    }
}
