//! Mock query service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use label_merger::error::{Error, Result};
use label_merger::platform::{PullRequestPage, QueryService};
use label_merger::types::PullRequest;
use std::sync::Mutex;

/// Call record for `fetch_page`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPageCall {
    pub owner: String,
    pub repo: String,
    pub cursor: Option<String>,
}

/// Scripted query service
///
/// Serves its pages in call order, regardless of the cursor passed in, so
/// tests can also script misbehaving servers (repeated cursors).
///
/// Features:
/// - Call tracking for verification
/// - Error injection on a specific page
pub struct MockQueryService {
    pages: Vec<PullRequestPage>,
    fetch_calls: Mutex<Vec<FetchPageCall>>,
    error_on_page: Mutex<Option<(usize, String)>>,
}

impl MockQueryService {
    /// Serve the given pages verbatim
    pub fn with_pages(pages: Vec<PullRequestPage>) -> Self {
        Self {
            pages,
            fetch_calls: Mutex::new(Vec::new()),
            error_on_page: Mutex::new(None),
        }
    }

    /// Chain record batches with cursors `cursor-1`, `cursor-2`, ...
    pub fn paged(batches: Vec<Vec<PullRequest>>) -> Self {
        let last = batches.len().saturating_sub(1);
        let pages = batches
            .into_iter()
            .enumerate()
            .map(|(i, pull_requests)| PullRequestPage {
                pull_requests,
                next_cursor: (i < last).then(|| format!("cursor-{}", i + 1)),
            })
            .collect();
        Self::with_pages(pages)
    }

    /// A single page holding every record
    pub fn single_page(prs: Vec<PullRequest>) -> Self {
        Self::paged(vec![prs])
    }

    /// Fail the request for page `index` (0-based) with `message`
    pub fn fail_on_page(&self, index: usize, message: &str) {
        *self.error_on_page.lock().unwrap() = Some((index, message.to_string()));
    }

    /// All recorded `fetch_page` calls
    pub fn get_fetch_calls(&self) -> Vec<FetchPageCall> {
        self.fetch_calls.lock().unwrap().clone()
    }

    /// Cursors passed to `fetch_page`, in call order
    pub fn requested_cursors(&self) -> Vec<Option<String>> {
        self.get_fetch_calls()
            .into_iter()
            .map(|c| c.cursor)
            .collect()
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn fetch_page(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<PullRequestPage> {
        let index = {
            let mut calls = self.fetch_calls.lock().unwrap();
            calls.push(FetchPageCall {
                owner: owner.to_string(),
                repo: repo.to_string(),
                cursor: cursor.map(String::from),
            });
            calls.len() - 1
        };

        if let Some((failing, msg)) = self.error_on_page.lock().unwrap().as_ref()
            && *failing == index
        {
            return Err(Error::GitHubApi(msg.clone()));
        }

        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("no page scripted for request {index}")))
    }
}
