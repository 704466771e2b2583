//! Key repository: read-only queries over the key directory.
//!
//! Scans for private-key files matching the naming scheme, groups them by
//! label, and answers existence/lookup probes. No caching: every operation
//! re-reads the directory, so callers always see post-mutation reality.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::core::naming::{self, Algorithm};
use crate::error::Result;

/// Facts about one private key on disk. Plain data, no behavior.
#[derive(Debug, Clone)]
pub struct KeyInfo {
    pub algorithm: Algorithm,
    pub private_path: PathBuf,
    pub public_path: PathBuf,
    /// A private key without its public half is allowed but incomplete.
    pub has_public: bool,
    pub size: u64,
    pub modified: DateTime<Local>,
}

/// Read-only view over the key directory.
pub struct KeyStore {
    dir: PathBuf,
}

impl KeyStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    /// Every key in the directory, grouped by canonical label.
    ///
    /// Public-key files and names outside the naming scheme are skipped.
    pub fn scan_all(&self) -> Result<BTreeMap<String, Vec<KeyInfo>>> {
        let mut keys: BTreeMap<String, Vec<KeyInfo>> = BTreeMap::new();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(".pub") || !entry.file_type()?.is_file() {
                continue;
            }
            let Some((algorithm, label)) = naming::parse_file_name(&name) else {
                continue;
            };

            let metadata = entry.metadata()?;
            let private_path = entry.path();
            let public_path = public_path_for(&private_path);
            let modified = metadata
                .modified()
                .map(DateTime::<Local>::from)
                .unwrap_or_else(|_| Local::now());

            keys.entry(label).or_default().push(KeyInfo {
                algorithm,
                has_public: public_path.exists(),
                public_path,
                size: metadata.len(),
                modified,
                private_path,
            });
        }

        Ok(keys)
    }

    /// First algorithm (in fixed priority order) with a key for `label`.
    pub fn detect_algorithm_for_label(&self, label: &str) -> Option<Algorithm> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| self.dir.join(naming::file_name_for(*algorithm, label)).exists())
    }

    /// First algorithm (in fixed priority order) with a canonical key.
    pub fn detect_default_algorithm(&self) -> Option<Algorithm> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| self.dir.join(algorithm.canonical_file_name()).exists())
    }
}

/// The `.pub` companion path of a private key.
pub fn public_path_for(private: &Path) -> PathBuf {
    let mut name = private.as_os_str().to_os_string();
    name.push(".pub");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "key material").unwrap();
    }

    #[test]
    fn scan_of_empty_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = KeyStore::new(tmp.path());
        assert!(store.scan_all().unwrap().is_empty());
    }

    #[test]
    fn scan_groups_by_label_and_skips_noise() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "id_ed25519");
        touch(tmp.path(), "id_ed25519.pub");
        touch(tmp.path(), "id_ed25519.github");
        touch(tmp.path(), "id_ed25519.github.pub");
        touch(tmp.path(), "id_rsa.github");
        touch(tmp.path(), "known_hosts");
        touch(tmp.path(), "config");

        let store = KeyStore::new(tmp.path());
        let keys = store.scan_all().unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(keys["default"].len(), 1);
        assert_eq!(keys["github"].len(), 2);

        let github_ed = keys["github"]
            .iter()
            .find(|k| k.algorithm == Algorithm::Ed25519)
            .unwrap();
        assert!(github_ed.has_public);

        let github_rsa = keys["github"]
            .iter()
            .find(|k| k.algorithm == Algorithm::Rsa)
            .unwrap();
        assert!(!github_rsa.has_public);
    }

    #[test]
    fn detection_follows_priority_order() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "id_rsa.work");
        touch(tmp.path(), "id_ecdsa.work");

        let store = KeyStore::new(tmp.path());
        assert_eq!(store.detect_algorithm_for_label("work"), Some(Algorithm::Rsa));
        assert_eq!(store.detect_algorithm_for_label("absent"), None);
    }

    #[test]
    fn default_detection_probes_canonical_names() {
        let tmp = TempDir::new().unwrap();
        let store = KeyStore::new(tmp.path());
        assert_eq!(store.detect_default_algorithm(), None);

        touch(tmp.path(), "id_dsa");
        assert_eq!(store.detect_default_algorithm(), Some(Algorithm::Dsa));

        touch(tmp.path(), "id_ed25519");
        assert_eq!(store.detect_default_algorithm(), Some(Algorithm::Ed25519));
    }
}
