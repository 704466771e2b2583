//! Git-remote binding and connection probing.
//!
//! Rewrites a repository's `origin` URL to route through a label's derived
//! alias, so pushes to that remote pick up the label's key via the
//! generated config block. The rewrite is computed as a plan first; the
//! CLI confirms before the plan is applied.

use std::fs;
use std::path::{Path, PathBuf};

use super::KeyManager;
use crate::core::external;
use crate::core::external::ssh::ProbeOutcome;
use crate::core::hosts::{self, ParsedRemote};
use crate::core::keystore::public_path_for;
use crate::core::naming::{canonical_label, Algorithm};
use crate::error::{KeyError, RepoError, Result};

/// A proposed remote rewrite, not yet applied.
pub struct RemotePlan {
    pub repo_path: PathBuf,
    pub current_url: String,
    pub remote: ParsedRemote,
    pub label: String,
    pub alias: String,
    pub new_url: String,
}

/// What `info` reports about a repository.
pub struct RepoInfo {
    pub repo_path: PathBuf,
    pub remote_url: String,
    pub remote: Option<ParsedRemote>,
    /// The sshm alias in use, when the remote routes through one.
    pub alias: Option<String>,
    pub key: Option<RepoKeyInfo>,
    /// Raw text of the matching generated config block.
    pub config_block: Option<String>,
}

/// Key facts resolved from an alias found in a remote URL.
pub struct RepoKeyInfo {
    pub label: String,
    pub algorithm: Algorithm,
    pub private_path: PathBuf,
    pub public_path: PathBuf,
}

/// One row of `test --all`.
pub struct ProbeReport {
    pub label: String,
    pub alias: String,
    pub algorithms: String,
    pub outcome: ProbeOutcome,
}

impl KeyManager {
    /// Plan rewriting `repo_path`'s origin remote to use `label`'s alias.
    pub fn plan_remote(&self, label: &str, repo_path: &Path) -> Result<RemotePlan> {
        let repo_path = resolve_repo(repo_path)?;
        let label = canonical_label(label);

        if self.store().detect_algorithm_for_label(&label).is_none() {
            return Err(KeyError::LabelNotFound(label).into());
        }

        let current_url = external::git::remote_url(&repo_path)?;
        let remote = hosts::parse_git_url(&current_url)
            .ok_or_else(|| RepoError::UnparseableUrl(current_url.clone()))?;

        let alias = hosts::host_alias(&label);
        let new_url = format!("git@{}:{}/{}.git", alias, remote.owner, remote.repo);

        Ok(RemotePlan {
            repo_path,
            current_url,
            remote,
            label,
            alias,
            new_url,
        })
    }

    /// Apply a previously confirmed plan.
    pub fn apply_remote(&self, plan: &RemotePlan) -> Result<()> {
        external::git::set_remote_url(&plan.repo_path, &plan.new_url)
    }

    /// Inspect a repository's remote and any alias/key it routes through.
    pub fn repo_info(&self, repo_path: &Path) -> Result<RepoInfo> {
        let repo_path = resolve_repo(repo_path)?;
        let remote_url = external::git::remote_url(&repo_path)?;
        let remote = hosts::parse_git_url(&remote_url);

        let alias = hosts::ssh_host(&remote_url)
            .filter(|host| host.contains('-'))
            .map(str::to_string);

        let (key, config_block) = match &alias {
            Some(alias) => {
                let key = hosts::label_from_alias(alias).and_then(|label| {
                    let algorithm = self.store().detect_algorithm_for_label(label)?;
                    let private_path = self.key_path(algorithm, label);
                    Some(RepoKeyInfo {
                        label: label.to_string(),
                        algorithm,
                        public_path: public_path_for(&private_path),
                        private_path,
                    })
                });
                (key, self.config().block_text(alias))
            }
            None => (None, None),
        };

        Ok(RepoInfo {
            repo_path,
            remote_url,
            remote,
            alias,
            key,
            config_block,
        })
    }

    /// Probe the alias derived from `label`.
    pub fn probe_label(&self, label: &str) -> Result<(String, ProbeOutcome)> {
        let label = canonical_label(label);
        if self.store().detect_algorithm_for_label(&label).is_none() {
            return Err(KeyError::LabelNotFound(label).into());
        }

        let alias = hosts::host_alias(&label);
        let outcome = external::ssh::probe(&alias);
        Ok((alias, outcome))
    }

    /// Probe every label's alias, one row per label.
    pub fn probe_all(&self) -> Result<Vec<ProbeReport>> {
        let mut reports = Vec::new();
        for (label, keys) in self.scan()? {
            let alias = hosts::host_alias(&label);
            let algorithms = keys
                .iter()
                .map(|key| key.algorithm.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let outcome = external::ssh::probe(&alias);
            reports.push(ProbeReport {
                label,
                alias,
                algorithms,
                outcome,
            });
        }
        Ok(reports)
    }

    /// Probe the alias found in a repository's remote URL.
    ///
    /// Returns the remote URL and, when the remote is SSH-form, the probed
    /// alias with its outcome. A non-SSH remote yields `None` (the caller
    /// suggests converting it).
    pub fn probe_repo(&self, repo_path: &Path) -> Result<(String, Option<(String, ProbeOutcome)>)> {
        let repo_path = resolve_repo(repo_path)?;
        let remote_url = external::git::remote_url(&repo_path)?;

        let probed = hosts::ssh_host(&remote_url).map(|host| {
            let outcome = external::ssh::probe(host);
            (host.to_string(), outcome)
        });

        Ok((remote_url, probed))
    }
}

fn resolve_repo(path: &Path) -> Result<PathBuf> {
    let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !resolved.join(".git").exists() {
        return Err(RepoError::NotARepository(resolved).into());
    }
    Ok(resolved)
}
