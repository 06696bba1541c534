//! label-merger - merge labeled pull requests into an integration branch
//!
//! This library collects the open pull requests of a GitHub repository,
//! keeps the ones carrying a given label, and merges their head branches one
//! by one into a freshly created target branch. Failed merges are rolled
//! back and reported instead of aborting the batch.
//!
//! # Architecture
//!
//! - [`platform`] - paginated PR retrieval behind the `QueryService` trait
//! - [`merge`] - plan (pure) and execute (effectful) phases of a run
//! - [`git`] - the `Vcs` trait and its `git` CLI implementation
//! - [`config`] / [`auth`] - input and credential resolution
//!
//! All I/O is async and state is passed explicitly (no globals).

pub mod auth;
pub mod config;
pub mod error;
pub mod git;
pub mod merge;
pub mod platform;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
