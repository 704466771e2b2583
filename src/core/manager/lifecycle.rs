//! Key lifecycle operations: add, switch, tag, rename, remove.
//!
//! Ordering is the correctness property here. Every destructive step is
//! preceded by its backup: the canonical key is preserved as `.original`
//! exactly once, ever; the previously active label is backed up before the
//! canonical file is overwritten; deletions take one snapshot before the
//! first file goes away. Switching keys must never lose reachability to a
//! previously active key.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::KeyManager;
use crate::core::constants::{DEFAULT_LABEL, ORIGINAL_LABEL};
use crate::core::external;
use crate::core::hosts;
use crate::core::keystore::public_path_for;
use crate::core::naming::{canonical_label, Algorithm};
use crate::error::{KeyError, Result};

/// Result of `add`.
#[derive(Debug)]
pub struct AddOutcome {
    pub private_path: PathBuf,
    /// Public key text for the caller to register with the Git platform.
    pub public_key: Option<String>,
    /// `(alias, hostname)` when a config block was written.
    pub config: Option<(String, String)>,
}

/// Result of `switch`.
pub struct SwitchOutcome {
    pub label: String,
    pub algorithm: Algorithm,
    /// Whether the algorithm was auto-detected rather than given.
    pub detected: bool,
    /// File name of the `.original` backup, when this switch created it.
    pub original_backup: Option<String>,
    pub alias: String,
    pub hostname: &'static str,
    pub target: PathBuf,
}

/// Result of `tag`.
#[derive(Debug)]
pub struct TagOutcome {
    pub algorithm: Algorithm,
    pub target: PathBuf,
    pub overwrote: bool,
}

/// Result of `remove`.
pub struct RemoveOutcome {
    /// File names deleted, in deletion order. Empty means nothing matched.
    pub removed: Vec<String>,
    /// Snapshot taken before the first deletion.
    pub backup: Option<PathBuf>,
    /// Config block alias that was removed alongside the files.
    pub alias: Option<String>,
    /// Algorithms whose state entry was cleared.
    pub cleared: Vec<Algorithm>,
}

impl KeyManager {
    /// Create a new labeled key pair via the external generator.
    ///
    /// Fails if a file already exists at the derived name. With `host`,
    /// also writes a config block keyed by the label's derived alias.
    pub fn add(
        &self,
        label: &str,
        email: &str,
        algorithm: Algorithm,
        host: Option<&str>,
    ) -> Result<AddOutcome> {
        let label = canonical_label(label);
        let private_path = self.key_path(algorithm, &label);
        if private_path.exists() {
            return Err(KeyError::AlreadyExists(file_name_of(&private_path)).into());
        }

        info!(%label, %algorithm, "generating key pair");
        external::keygen::generate(algorithm, email, &private_path)?;

        let config = match host {
            Some(host) => {
                let alias = hosts::host_alias(&label);
                self.config().upsert(&alias, host, &private_path)?;
                Some((alias, host.to_string()))
            }
            None => None,
        };

        let public_key = fs::read_to_string(public_path_for(&private_path))
            .ok()
            .map(|text| text.trim().to_string());

        Ok(AddOutcome {
            private_path,
            public_key,
            config,
        })
    }

    /// Make `label` the active key for its algorithm.
    ///
    /// Copies the labeled key over the canonical file, after preserving
    /// what the copy would destroy: the very first canonical key as
    /// `.original` (at most once, forever), and the currently active
    /// label's content under its own name if it has no file yet.
    pub fn switch(&self, label: &str, algorithm: Option<Algorithm>) -> Result<SwitchOutcome> {
        let label = canonical_label(label);
        if label == DEFAULT_LABEL {
            // The canonical key is not a switch target; there is nothing
            // to copy it from.
            return Err(KeyError::LabelNotFound(label).into());
        }

        let (algorithm, detected) = match algorithm {
            Some(algorithm) => (algorithm, false),
            None => (
                self.store()
                    .detect_algorithm_for_label(&label)
                    .ok_or_else(|| KeyError::LabelNotFound(label.clone()))?,
                true,
            ),
        };

        let source = self.key_path(algorithm, &label);
        if !source.exists() {
            return Err(KeyError::FileMissing(file_name_of(&source)).into());
        }

        let target = self.ssh_dir().join(algorithm.canonical_file_name());
        let mut original_backup = None;

        if target.exists() {
            let current = self
                .state()
                .read_active()
                .get(&algorithm)
                .cloned()
                .unwrap_or_else(|| ORIGINAL_LABEL.to_string());

            let original = self.key_path(algorithm, ORIGINAL_LABEL);
            if !original.exists() {
                copy_pair(&target, &original)?;
                original_backup = Some(file_name_of(&original));
                debug!(file = %original.display(), "preserved first canonical key");
            }

            if current != ORIGINAL_LABEL {
                let fallback = self.key_path(algorithm, &current);
                if !fallback.exists() {
                    copy_pair(&target, &fallback)?;
                    debug!(%current, "backed up previously active key");
                }
            }
        }

        copy_pair(&source, &target)?;
        self.state().set_active(algorithm, &label)?;

        let hostname = hosts::hostname_for_label(&label);
        let alias = hosts::host_alias(&label);
        self.config().upsert(&alias, hostname, &source)?;

        info!(%label, %algorithm, "switched active key");
        Ok(SwitchOutcome {
            label,
            algorithm,
            detected,
            original_backup,
            alias,
            hostname,
            target,
        })
    }

    /// Copy the canonical key to a new labeled file (inverse of switch).
    ///
    /// Refuses to overwrite an existing label unless `overwrite` is set;
    /// the CLI prompts and retries on [`KeyError::TargetExists`].
    pub fn tag(
        &self,
        algorithm: Option<Algorithm>,
        new_label: &str,
        overwrite: bool,
    ) -> Result<TagOutcome> {
        let label = canonical_label(new_label);
        if label == DEFAULT_LABEL {
            return Err(KeyError::ReservedLabel(label).into());
        }

        let algorithm = match algorithm {
            Some(algorithm) => algorithm,
            None => self
                .store()
                .detect_default_algorithm()
                .ok_or(KeyError::NoDefaultKey)?,
        };

        let source = self.ssh_dir().join(algorithm.canonical_file_name());
        if !source.exists() {
            return Err(KeyError::FileMissing(file_name_of(&source)).into());
        }

        let target = self.key_path(algorithm, &label);
        let overwrote = target.exists();
        if overwrote && !overwrite {
            return Err(KeyError::TargetExists(label).into());
        }

        copy_pair(&source, &target)?;
        info!(%label, %algorithm, "tagged canonical key");
        Ok(TagOutcome {
            algorithm,
            target,
            overwrote,
        })
    }

    /// Rename a label: key files, config block, and state entries.
    ///
    /// Forbidden for `default`; never overwrites an existing target.
    pub fn rename(
        &self,
        old_label: &str,
        new_label: &str,
        algorithm: Option<Algorithm>,
    ) -> Result<(Algorithm, String, String)> {
        let old = canonical_label(old_label);
        let new = canonical_label(new_label);
        if old == DEFAULT_LABEL {
            return Err(KeyError::RenameDefault.into());
        }
        if new == DEFAULT_LABEL {
            return Err(KeyError::ReservedLabel(new).into());
        }

        let algorithm = self
            .store()
            .detect_algorithm_for_label(&old)
            .or(algorithm)
            .ok_or_else(|| KeyError::LabelNotFound(old.clone()))?;

        let old_file = self.key_path(algorithm, &old);
        let new_file = self.key_path(algorithm, &new);
        if !old_file.exists() {
            return Err(KeyError::FileMissing(file_name_of(&old_file)).into());
        }
        if new_file.exists() {
            return Err(KeyError::TargetExists(new).into());
        }

        fs::rename(&old_file, &new_file)?;
        let old_pub = public_path_for(&old_file);
        if old_pub.exists() {
            fs::rename(&old_pub, public_path_for(&new_file))?;
        }

        let old_alias = hosts::host_alias(&old);
        let new_alias = hosts::host_alias(&new);
        self.config()
            .rename(&old_alias, &new_alias, hosts::hostname_for_label(&new), &new_file)?;
        self.state().rename_label(&old, &new)?;

        info!(%old, %new, "renamed label");
        Ok((algorithm, old_alias, new_alias))
    }

    /// Delete every key file for `label` in the given algorithm scope.
    ///
    /// Exactly one snapshot is taken before the first deletion, never one
    /// per file. The config block and matching state entries go with the
    /// files. Confirmation for the `default` label is the caller's duty.
    pub fn remove(&self, label: &str, algorithm: Option<Algorithm>) -> Result<RemoveOutcome> {
        let label = canonical_label(label);
        let scope: Vec<Algorithm> = match algorithm {
            Some(algorithm) => vec![algorithm],
            None => Algorithm::ALL.to_vec(),
        };

        let mut candidates = Vec::new();
        for algorithm in &scope {
            let private = self.key_path(*algorithm, &label);
            candidates.push(private.clone());
            candidates.push(public_path_for(&private));
        }

        let mut removed = Vec::new();
        let mut backup = None;
        for path in &candidates {
            if !path.is_file() {
                continue;
            }
            if backup.is_none() {
                backup = Some(self.archive().snapshot()?.path);
            }
            fs::remove_file(path)?;
            removed.push(file_name_of(path));
        }

        if removed.is_empty() {
            return Ok(RemoveOutcome {
                removed,
                backup: None,
                alias: None,
                cleared: Vec::new(),
            });
        }

        let alias = hosts::host_alias(&label);
        self.config().remove(&alias)?;

        let mut cleared = Vec::new();
        for algorithm in &scope {
            let changed = if label == DEFAULT_LABEL {
                self.state().clear_active(*algorithm)?
            } else {
                self.state().clear_if(*algorithm, &label)?
            };
            if changed {
                cleared.push(*algorithm);
            }
        }

        info!(%label, files = removed.len(), "removed key");
        Ok(RemoveOutcome {
            removed,
            backup,
            alias: Some(alias),
            cleared,
        })
    }
}

/// Copy a private key and, when present, its public companion.
///
/// A missing public half is allowed (the pair is merely incomplete).
fn copy_pair(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)?;
    let from_pub = public_path_for(from);
    if from_pub.exists() {
        fs::copy(&from_pub, public_path_for(to))?;
    }
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
