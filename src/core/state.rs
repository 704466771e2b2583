//! Active-key state store.
//!
//! Persists the mapping from key algorithm to the currently-active label in
//! a small JSON document next to the keys. Reads are tolerant: a missing or
//! corrupt document is empty state, never an error. Writes rewrite the whole
//! document in one go so an interrupt can never leave it half-written.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::constants::STATE_FILE;
use crate::core::naming::{canonical_label, Algorithm};
use crate::error::{Result, StateError};

/// Store for the algorithm → active-label mapping.
pub struct StateStore {
    path: PathBuf,
    ssh_dir: PathBuf,
}

impl StateStore {
    pub fn new(ssh_dir: &Path) -> Self {
        Self {
            path: ssh_dir.join(STATE_FILE),
            ssh_dir: ssh_dir.to_path_buf(),
        }
    }

    /// Path of the state document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the active mapping, dropping stale entries.
    ///
    /// An entry is stale when its algorithm has no canonical key file on
    /// disk; such entries are treated as absent.
    pub fn read_active(&self) -> BTreeMap<Algorithm, String> {
        self.read_raw()
            .into_iter()
            .filter(|(algorithm, _)| self.ssh_dir.join(algorithm.canonical_file_name()).exists())
            .collect()
    }

    /// Record `label` as the active key for `algorithm`.
    pub fn set_active(&self, algorithm: Algorithm, label: &str) -> Result<()> {
        let mut state = self.read_raw();
        state.insert(algorithm, canonical_label(label));
        self.write(&state)
    }

    /// Remove the entry for `algorithm`. Returns whether an entry existed.
    pub fn clear_active(&self, algorithm: Algorithm) -> Result<bool> {
        let mut state = self.read_raw();
        if state.remove(&algorithm).is_none() {
            return Ok(false);
        }
        self.write(&state)?;
        Ok(true)
    }

    /// Remove the entry for `algorithm` only if it points at `label`.
    pub fn clear_if(&self, algorithm: Algorithm, label: &str) -> Result<bool> {
        let label = canonical_label(label);
        let mut state = self.read_raw();
        match state.get(&algorithm) {
            Some(active) if *active == label => {
                state.remove(&algorithm);
                self.write(&state)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Rewrite every entry pointing at `old` to point at `new`.
    ///
    /// Several algorithms may share one label; all are updated in a single
    /// rewrite. No-op when nothing matches.
    pub fn rename_label(&self, old: &str, new: &str) -> Result<()> {
        let old = canonical_label(old);
        let new = canonical_label(new);

        let mut state = self.read_raw();
        let mut changed = false;
        for label in state.values_mut() {
            if *label == old {
                *label = new.clone();
                changed = true;
            }
        }

        if changed {
            self.write(&state)?;
        }
        Ok(())
    }

    /// Raw document contents: no staleness filtering, unknown algorithm
    /// keys skipped, labels lowercased. Missing or corrupt file is empty.
    fn read_raw(&self) -> BTreeMap<Algorithm, String> {
        let Ok(text) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };

        let Ok(raw) = serde_json::from_str::<BTreeMap<String, String>>(&text) else {
            debug!(path = %self.path.display(), "state file unparseable, treating as empty");
            return BTreeMap::new();
        };

        raw.into_iter()
            .filter_map(|(algorithm, label)| {
                let algorithm: Algorithm = algorithm.parse().ok()?;
                Some((algorithm, canonical_label(&label)))
            })
            .collect()
    }

    fn write(&self, state: &BTreeMap<Algorithm, String>) -> Result<()> {
        let doc: BTreeMap<&str, &str> = state
            .iter()
            .map(|(algorithm, label)| (algorithm.as_str(), label.as_str()))
            .collect();

        let text = serde_json::to_string_pretty(&doc).map_err(|e| StateError::Write {
            path: self.path.clone(),
            source: std::io::Error::other(e),
        })?;
        fs::write(&self.path, text).map_err(|source| StateError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
