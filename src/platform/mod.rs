//! Pull request retrieval from the hosting service
//!
//! [`QueryService`] hides the paginated API; [`PullRequestService`] binds it
//! to one repository so the merge run only ever sees a complete collection.

mod detection;
pub(crate) mod github;

pub use detection::{parse_repo_info, resolve_repo};
pub use github::GitHubQueryService;

use crate::error::{Error, Result};
use crate::types::PullRequest;
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

/// One page of a pull request listing
#[derive(Debug, Clone, Default)]
pub struct PullRequestPage {
    /// Records on this page, in server order
    pub pull_requests: Vec<PullRequest>,
    /// Cursor for the next page; `None` on the last page
    pub next_cursor: Option<String>,
}

/// Paginated pull request queries against the hosting API
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Fetch one page of open pull requests.
    ///
    /// `cursor` is `None` for the first page and the previous page's
    /// `next_cursor` afterwards.
    async fn fetch_page(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<PullRequestPage>;

    /// Fetch every open pull request of a repository.
    ///
    /// Follows cursors until the last page, keeps server order and drops
    /// duplicate numbers (first occurrence wins). Any page error aborts the
    /// whole retrieval. Implementors should override [`fetch_page`], not
    /// this method.
    ///
    /// [`fetch_page`]: Self::fetch_page
    async fn fetch_all_pull_requests(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>> {
        let mut all = Vec::new();
        let mut seen_cursors = HashSet::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.fetch_page(owner, repo, cursor.as_deref()).await?;
            debug!(
                owner,
                repo,
                count = page.pull_requests.len(),
                has_next = page.next_cursor.is_some(),
                "fetched pull request page"
            );
            all.extend(page.pull_requests);

            match page.next_cursor {
                Some(next) => {
                    if !seen_cursors.insert(next.clone()) {
                        return Err(Error::GitHubApi(format!(
                            "pagination cursor {next} returned twice"
                        )));
                    }
                    cursor = Some(next);
                }
                None => break,
            }
        }

        Ok(dedup_by_number(all))
    }
}

/// Drop pull requests whose number was already seen, keeping order
pub fn dedup_by_number(prs: Vec<PullRequest>) -> Vec<PullRequest> {
    let mut seen = HashSet::new();
    prs.into_iter().filter(|pr| seen.insert(pr.number)).collect()
}

/// All pull requests of one repository
///
/// A thin pass-through to [`QueryService`]: no filtering, no caching.
pub struct PullRequestService {
    query: Box<dyn QueryService>,
    owner: String,
    repo: String,
}

impl PullRequestService {
    /// Bind a query service to `owner/repo`
    pub fn new(query: Box<dyn QueryService>, owner: String, repo: String) -> Self {
        Self { query, owner, repo }
    }

    /// Repository owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Every open pull request of the repository
    pub async fn get_all_prs(&self) -> Result<Vec<PullRequest>> {
        self.query
            .fetch_all_pull_requests(&self.owner, &self.repo)
            .await
    }
}
