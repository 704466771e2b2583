//! Git remote inspection and mutation.
//!
//! Only the `origin` remote URL is read or written; "no such remote" is a
//! distinguished error so callers can suggest adding one.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{RepoError, Result};

/// Read the `origin` remote URL of `repo`.
pub fn remote_url(repo: &Path) -> Result<String> {
    let output = git(repo)?
        .args(["remote", "get-url", "origin"])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("No such remote") {
            return Err(RepoError::NoOriginRemote.into());
        }
        return Err(RepoError::GitFailed(stderr.trim().to_string()).into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Point the `origin` remote of `repo` at `url`.
pub fn set_remote_url(repo: &Path, url: &str) -> Result<()> {
    debug!(repo = %repo.display(), url, "rewriting origin remote");
    let output = git(repo)?
        .args(["remote", "set-url", "origin", url])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RepoError::GitFailed(stderr.trim().to_string()).into());
    }

    Ok(())
}

fn git(repo: &Path) -> Result<Command> {
    let bin: PathBuf = which::which("git").map_err(|_| RepoError::GitNotFound)?;
    let mut cmd = Command::new(bin);
    cmd.arg("-C").arg(repo);
    Ok(cmd)
}
