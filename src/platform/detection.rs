//! Repository detection from `owner/repo` slugs and remote URLs

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// scp-like syntax: `[user@]host:owner/repo[.git]`
static SCP_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^@/\s]+@)?([^:/\s]+):/?([^/\s]+)/([^/\s]+?)(?:\.git)?/?$")
        .expect("remote regex is valid")
});

/// Hosts that mean github.com itself
const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com", "ssh.github.com"];

fn normalize_host(host: &str) -> Option<String> {
    let host = host.to_ascii_lowercase();
    if GITHUB_HOSTS.contains(&host.as_str()) {
        None
    } else {
        Some(host)
    }
}

fn split_owner_repo(path: &str) -> Option<(String, String)> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
            Some((owner.to_string(), repo.to_string()))
        }
        _ => None,
    }
}

/// Parse a git remote URL into repository coordinates
///
/// Accepts `https://`, `ssh://` and scp-like `git@host:owner/repo.git`
/// remotes. Hosts other than github.com are kept as GitHub Enterprise hosts.
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let url = url.trim();

    // `host:owner/repo` also parses as a URL with scheme `host`, but no host
    if let Ok(parsed) = Url::parse(url)
        && let Some(host) = parsed.host_str()
    {
        let (owner, repo) = split_owner_repo(parsed.path())
            .ok_or_else(|| Error::RepoNotFound(format!("cannot parse owner/repo from {url}")))?;
        return Ok(PlatformConfig {
            owner,
            repo,
            host: normalize_host(host),
        });
    }

    let caps = SCP_REMOTE
        .captures(url)
        .ok_or_else(|| Error::RepoNotFound(format!("unrecognized remote URL: {url}")))?;

    Ok(PlatformConfig {
        owner: caps[2].to_string(),
        repo: caps[3].to_string(),
        host: normalize_host(&caps[1]),
    })
}

/// Parse an `owner/repo` slug (as in `--repo` or `GITHUB_REPOSITORY`)
pub fn resolve_repo(slug: &str, host: Option<&str>) -> Result<PlatformConfig> {
    let (owner, repo) = split_owner_repo(slug.trim())
        .ok_or_else(|| Error::RepoNotFound(format!("expected owner/repo, got {slug:?}")))?;
    Ok(PlatformConfig {
        owner,
        repo,
        host: host.and_then(normalize_host),
    })
}
