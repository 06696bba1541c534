//! GitHub token resolution

use super::AuthSource;
use crate::error::{Error, Result};
use crate::platform::github::{GraphQlResponse, build_client, graphql_route};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Pick a token from an explicit value or the environment
///
/// Blank values are ignored. `env` is a lookup function so callers (and
/// tests) control which environment is consulted.
pub fn token_from_sources<F>(explicit: Option<&str>, env: F) -> Option<GitHubAuthConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Some(GitHubAuthConfig {
            token: token.to_string(),
            source: AuthSource::Argument,
        });
    }

    TOKEN_ENV_VARS.iter().find_map(|var| {
        env(var)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(|token| GitHubAuthConfig {
                token,
                source: AuthSource::EnvVar,
            })
    })
}

/// Resolve a GitHub token
///
/// Order: `explicit`, `GITHUB_TOKEN`, `GH_TOKEN`, then `gh auth token`.
pub async fn get_github_auth(explicit: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(config) = token_from_sources(explicit, |var| std::env::var(var).ok()) {
        debug!(source = %config.source, "using GitHub token");
        return Ok(config);
    }

    debug!("no token in arguments or environment, trying gh CLI");
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await
        .map_err(|e| {
            Error::Auth(format!(
                "no GitHub token found (pass --token or set GITHUB_TOKEN); gh CLI unavailable: {e}"
            ))
        })?;

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || token.is_empty() {
        return Err(Error::Auth(
            "no GitHub token found; pass --token, set GITHUB_TOKEN, or run `gh auth login`"
                .to_string(),
        ));
    }

    debug!(source = %AuthSource::Cli, "using GitHub token");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
    })
}

/// Check that the token works, returning the authenticated login
pub async fn test_github_auth(config: &GitHubAuthConfig, host: Option<&str>) -> Result<String> {
    #[derive(Deserialize)]
    struct ViewerData {
        viewer: Viewer,
    }

    #[derive(Deserialize)]
    struct Viewer {
        login: String,
    }

    let client = build_client(&config.token, host)?;
    let response: GraphQlResponse<ViewerData> = client
        .post(
            graphql_route(host),
            Some(&serde_json::json!({ "query": "query { viewer { login } }" })),
        )
        .await
        .map_err(|e| Error::Auth(format!("token check failed: {e}")))?;

    let login = response
        .into_data()
        .map_err(|e| Error::Auth(e.to_string()))?
        .viewer
        .login;
    debug!(login = %login, "authenticated with GitHub");
    Ok(login)
}
