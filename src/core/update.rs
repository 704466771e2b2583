//! Release-metadata update check.
//!
//! One blocking round-trip to the GitHub latest-release endpoint, with a
//! 24-hour on-disk cache. Every failure path (network, HTTP status,
//! parse, unknown platform) degrades to "no update"; an update check must
//! never break the tool. Download and self-replacement are out of scope:
//! the check only reports what is available.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants::UPDATE_CACHE_FILE;
use crate::error::{Error, Result};

const RELEASE_API: &str = "https://api.github.com/repos/365tools/SSHKeyManager/releases/latest";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const CACHE_VALID: Duration = Duration::from_secs(24 * 60 * 60);

/// An available newer release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseInfo {
    pub version: String,
    pub download_url: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub published_at: String,
}

#[derive(Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
}

/// Checker comparing the running version against the latest release.
pub struct UpdateChecker {
    cache_path: PathBuf,
    current: &'static str,
}

impl UpdateChecker {
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        Ok(Self {
            cache_path: home.join(UPDATE_CACHE_FILE),
            current: env!("CARGO_PKG_VERSION"),
        })
    }

    pub fn current_version(&self) -> &str {
        self.current
    }

    /// Check for a newer release; `force` bypasses the cache.
    ///
    /// Returns `None` when up to date or when the check fails for any
    /// reason (silently degraded).
    pub fn check(&self, force: bool) -> Option<ReleaseInfo> {
        if !force {
            if let Some(cached) = self.read_cache() {
                return is_newer(&cached.version, self.current).then_some(cached);
            }
        }

        let release = self.fetch()?;
        if !is_newer(&release.tag_name, self.current) {
            return None;
        }

        let asset_name = platform_asset()?;
        let download_url = release
            .assets
            .into_iter()
            .find(|asset| asset.name == asset_name)?
            .browser_download_url;

        let info = ReleaseInfo {
            version: release.tag_name,
            download_url,
            notes: release.body,
            published_at: release.published_at,
        };
        self.write_cache(&info);
        Some(info)
    }

    /// Cached-only check used for the best-effort post-command notice.
    ///
    /// Never touches the network; returns `None` unless a fresh cache
    /// already records a newer release.
    pub fn cached_update(&self) -> Option<ReleaseInfo> {
        let cached = self.read_cache()?;
        is_newer(&cached.version, self.current).then_some(cached)
    }

    fn fetch(&self) -> Option<Release> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(format!("sshm/{}", self.current))
            .build()
            .ok()?;

        let response = match client.get(RELEASE_API).send() {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "update check failed");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(status = %response.status(), "update check rejected");
            return None;
        }

        response.json().ok()
    }

    fn read_cache(&self) -> Option<ReleaseInfo> {
        let metadata = fs::metadata(&self.cache_path).ok()?;
        let age = metadata.modified().ok()?.elapsed().ok()?;
        if age > CACHE_VALID {
            return None;
        }

        let text = fs::read_to_string(&self.cache_path).ok()?;
        serde_json::from_str(&text).ok()
    }

    fn write_cache(&self, info: &ReleaseInfo) {
        let Ok(text) = serde_json::to_string(info) else {
            return;
        };
        if let Err(e) = fs::write(&self.cache_path, text) {
            debug!(error = %e, "failed to write update cache");
        }
    }
}

/// Release asset name for the running platform.
fn platform_asset() -> Option<&'static str> {
    match std::env::consts::OS {
        "linux" => Some("sshm-linux-amd64"),
        "macos" => Some("sshm-macos-amd64"),
        "windows" => Some("sshm-windows-amd64.exe"),
        _ => None,
    }
}

/// Compare dotted numeric versions, tolerating a `v` prefix.
///
/// Unparseable versions never count as newer.
fn is_newer(latest: &str, current: &str) -> bool {
    match (parse_version(latest), parse_version(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => false,
    }
}

fn parse_version(version: &str) -> Option<Vec<u64>> {
    version
        .trim()
        .trim_start_matches('v')
        .split('.')
        .map(|part| part.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_versions_compare_greater() {
        assert!(is_newer("v2.2.0", "2.1.1"));
        assert!(is_newer("3.0.0", "v2.9.9"));
        assert!(!is_newer("2.1.1", "2.1.1"));
        assert!(!is_newer("v2.1.0", "2.1.1"));
    }

    #[test]
    fn unparseable_versions_are_not_newer() {
        assert!(!is_newer("nightly", "2.1.1"));
        assert!(!is_newer("2.1.x", "2.1.1"));
    }

    #[test]
    fn version_parsing_strips_prefix() {
        assert_eq!(parse_version("v1.2.3"), Some(vec![1, 2, 3]));
        assert_eq!(parse_version("10.0"), Some(vec![10, 0]));
        assert_eq!(parse_version("abc"), None);
    }
}
