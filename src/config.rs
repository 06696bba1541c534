//! Run configuration
//!
//! Values come from three layers, highest precedence first: command-line
//! flags (and their environment variables), a TOML config file, and
//! built-in defaults.

use crate::error::{Error, Result};
use crate::types::CommitterIdentity;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working copy root
pub const REPO_CONFIG_FILE: &str = "label-merger.toml";

/// Directory under the user config dir holding `config.toml`
const USER_CONFIG_DIR: &str = "label-merger";

/// Default base branch
pub const DEFAULT_BASE: &str = "main";

/// Default remote
pub const DEFAULT_REMOTE: &str = "origin";

/// Default committer name
pub const DEFAULT_COMMITTER_NAME: &str = "github-actions[bot]";

/// Default committer email
pub const DEFAULT_COMMITTER_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

/// One layer of optional settings (config file or command line)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    /// Branch the integration branch starts from
    pub base: Option<String>,
    /// Integration branch to create and force-push
    pub target: Option<String>,
    /// Label selecting the PRs to merge
    pub label_name: Option<String>,
    /// Committer email for merge commits
    pub email: Option<String>,
    /// Committer name for merge commits
    pub name: Option<String>,
    /// Git remote to fetch from and push to
    pub remote: Option<String>,
    /// Repository as `owner/repo`
    pub repo: Option<String>,
    /// GitHub Enterprise host
    pub host: Option<String>,
}

impl FileConfig {
    /// Fill every unset field of `self` from `lower`
    #[must_use]
    pub fn or(self, lower: Self) -> Self {
        Self {
            base: self.base.or(lower.base),
            target: self.target.or(lower.target),
            label_name: self.label_name.or(lower.label_name),
            email: self.email.or(lower.email),
            name: self.name.or(lower.name),
            remote: self.remote.or(lower.remote),
            repo: self.repo.or(lower.repo),
            host: self.host.or(lower.host),
        }
    }
}

/// Fully resolved settings for one merge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Base branch
    pub base: String,
    /// Target (integration) branch
    pub target: String,
    /// Label name to select PRs by
    pub label_name: String,
    /// Committer identity for merge commits
    pub identity: CommitterIdentity,
    /// Git remote
    pub remote: String,
    /// Repository slug, if configured
    pub repo: Option<String>,
    /// GitHub Enterprise host, if configured
    pub host: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RunConfig {
    /// Resolve a merged layer against the built-in defaults
    pub fn resolve(layer: FileConfig) -> Result<Self> {
        let target = non_blank(layer.target)
            .ok_or_else(|| Error::Config("no target branch configured (--target)".to_string()))?;
        let label_name = non_blank(layer.label_name)
            .ok_or_else(|| Error::Config("no label configured (--label-name)".to_string()))?;
        let base = non_blank(layer.base).unwrap_or_else(|| DEFAULT_BASE.to_string());

        if target == base {
            return Err(Error::Config(format!(
                "target branch must differ from base branch ({base})"
            )));
        }

        Ok(Self {
            base,
            target,
            label_name,
            identity: CommitterIdentity {
                name: non_blank(layer.name).unwrap_or_else(|| DEFAULT_COMMITTER_NAME.to_string()),
                email: non_blank(layer.email)
                    .unwrap_or_else(|| DEFAULT_COMMITTER_EMAIL.to_string()),
            },
            remote: non_blank(layer.remote).unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            repo: non_blank(layer.repo),
            host: non_blank(layer.host),
        })
    }
}

/// Load a config file
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Path of the per-user config file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join("config.toml"))
}

/// Find and load the config file for a run
///
/// An explicit path must exist. Otherwise `label-merger.toml` in the
/// working copy root is used, then the per-user file; when neither exists
/// an empty layer is returned.
pub fn find_config(explicit: Option<&Path>, repo_root: &Path) -> Result<FileConfig> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return load_config(path);
    }

    let candidates = std::iter::once(repo_root.join(REPO_CONFIG_FILE)).chain(user_config_path());
    for path in candidates {
        if path.is_file() {
            debug!(path = %path.display(), "loading config");
            return load_config(&path);
        }
    }

    debug!("no config file found, using defaults");
    Ok(FileConfig::default())
}
