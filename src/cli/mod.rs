//! Command-line front end

pub mod context;
pub mod progress;
pub mod report;
pub mod run;
pub mod style;

pub use progress::CliProgress;
pub use run::{MergeOptions, run_merge};
