//! GitHub query service implementation

use crate::error::{Error, Result};
use crate::platform::{PullRequestPage, QueryService};
use crate::types::{PlatformConfig, PullRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::{debug, warn};

/// Page size for the pull request connection (GitHub's maximum)
const PAGE_SIZE: u32 = 100;

/// Labels fetched per pull request
const LABELS_PER_PR: u32 = 100;

const OPEN_PULL_REQUESTS_QUERY: &str = r"
    query OpenPullRequests($owner: String!, $repo: String!, $first: Int!, $labels: Int!, $cursor: String) {
        repository(owner: $owner, name: $repo) {
            pullRequests(states: OPEN, first: $first, after: $cursor) {
                nodes {
                    number
                    title
                    url
                    baseRefName
                    headRefName
                    createdAt
                    labels(first: $labels) {
                        nodes {
                            name
                        }
                        pageInfo {
                            hasNextPage
                        }
                    }
                }
                pageInfo {
                    hasNextPage
                    endCursor
                }
            }
        }
    }
";

// GraphQL response types for the pull request listing

#[derive(Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub(crate) data: Option<T>,
    pub(crate) errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
pub(crate) struct GraphQlError {
    pub(crate) message: String,
}

impl<T> GraphQlResponse<T> {
    /// Extract `data`, turning GraphQL errors into `Error::GitHubApi`
    pub(crate) fn into_data(self) -> Result<T> {
        if let Some(errors) = self.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(format!(
                "GraphQL error: {}",
                messages.join(", ")
            )));
        }

        self.data
            .ok_or_else(|| Error::GitHubApi("No data in GraphQL response".to_string()))
    }
}

#[derive(Deserialize)]
struct RepositoryData {
    repository: Option<Repository>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Repository {
    pull_requests: PullRequestConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestConnection {
    nodes: Vec<Option<GraphQlPullRequest>>,
    page_info: PageInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPullRequest {
    number: u64,
    title: String,
    url: String,
    base_ref_name: String,
    head_ref_name: String,
    created_at: DateTime<Utc>,
    labels: Option<LabelConnection>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelConnection {
    nodes: Vec<Option<Label>>,
    page_info: Option<LabelPageInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelPageInfo {
    has_next_page: bool,
}

impl GraphQlPullRequest {
    /// More labels exist than the query returned
    fn labels_truncated(&self) -> bool {
        self.labels
            .as_ref()
            .and_then(|l| l.page_info.as_ref())
            .is_some_and(|info| info.has_next_page)
    }
}

#[derive(Deserialize)]
struct Label {
    name: String,
}

impl From<GraphQlPullRequest> for PullRequest {
    fn from(pr: GraphQlPullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            url: pr.url,
            base_ref: pr.base_ref_name,
            head_ref: pr.head_ref_name,
            created_at: pr.created_at,
            labels: pr
                .labels
                .map(|l| l.nodes.into_iter().flatten().map(|label| label.name).collect())
                .unwrap_or_default(),
        }
    }
}

/// Convert one GraphQL response into a page
fn page_from_response(
    response: GraphQlResponse<RepositoryData>,
    owner: &str,
    repo: &str,
) -> Result<PullRequestPage> {
    let repository = response
        .into_data()?
        .repository
        .ok_or_else(|| Error::GitHubApi(format!("repository {owner}/{repo} not found")))?;

    let connection = repository.pull_requests;
    let next_cursor = match (connection.page_info.has_next_page, connection.page_info.end_cursor) {
        (true, Some(cursor)) => Some(cursor),
        (true, None) => {
            return Err(Error::GitHubApi(
                "GitHub reported another page without a cursor".to_string(),
            ));
        }
        (false, _) => None,
    };

    let pull_requests = connection
        .nodes
        .into_iter()
        .flatten()
        .inspect(|pr| {
            if pr.labels_truncated() {
                warn!(
                    pr_number = pr.number,
                    limit = LABELS_PER_PR,
                    "PR has more labels than were fetched; labels past the limit are ignored"
                );
            }
        })
        .map(PullRequest::from)
        .collect();

    Ok(PullRequestPage {
        pull_requests,
        next_cursor,
    })
}

/// GraphQL endpoint path, relative to the client's base URI
pub(crate) const fn graphql_route(host: Option<&str>) -> &'static str {
    match host {
        Some(_) => "/api/graphql",
        None => "/graphql",
    }
}

/// Build an octocrab client for github.com or a GitHub Enterprise host
pub(crate) fn build_client(token: &str, host: Option<&str>) -> Result<Octocrab> {
    let mut builder = Octocrab::builder().personal_token(token.to_string());

    if let Some(h) = host {
        builder = builder
            .base_uri(format!("https://{h}"))
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
    }

    builder
        .build()
        .map_err(|e| Error::GitHubApi(e.to_string()))
}

/// GitHub query service using octocrab's GraphQL client
pub struct GitHubQueryService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubQueryService {
    /// Create a new GitHub query service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let client = build_client(token, host.as_deref())?;

        Ok(Self {
            client,
            config: PlatformConfig { owner, repo, host },
        })
    }

    /// Repository this service was created for
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

#[async_trait]
impl QueryService for GitHubQueryService {
    async fn fetch_page(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<PullRequestPage> {
        debug!(owner, repo, ?cursor, "querying open pull requests");

        let response: GraphQlResponse<RepositoryData> = self
            .client
            .post(
                graphql_route(self.config.host.as_deref()),
                Some(&serde_json::json!({
                    "query": OPEN_PULL_REQUESTS_QUERY,
                    "variables": {
                        "owner": owner,
                        "repo": repo,
                        "first": PAGE_SIZE,
                        "labels": LABELS_PER_PR,
                        "cursor": cursor,
                    }
                })),
            )
            .await
            .map_err(|e| Error::GitHubApi(format!("pull request query failed: {e}")))?;

        page_from_response(response, owner, repo)
    }
}
