//! The key lifecycle orchestrator.
//!
//! `KeyManager` is the composition root: it owns the state store, the
//! config block manager, the key repository, and the backup archiver, and
//! coordinates them with the external collaborators. All configuration is
//! explicit: the SSH directory root is passed in at construction, never
//! read from ambient globals.

mod lifecycle;
mod repo;

pub use lifecycle::{AddOutcome, RemoveOutcome, SwitchOutcome, TagOutcome};
pub use repo::{ProbeReport, RemotePlan, RepoInfo, RepoKeyInfo};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::backup::BackupArchive;
use crate::core::constants::CONFIG_FILE;
use crate::core::keystore::{KeyInfo, KeyStore};
use crate::core::naming::{self, Algorithm};
use crate::core::ssh_config::SshConfig;
use crate::core::state::StateStore;
use crate::error::Result;

/// Orchestrator over one SSH directory.
pub struct KeyManager {
    ssh_dir: PathBuf,
    state: StateStore,
    config: SshConfig,
    store: KeyStore,
    archive: BackupArchive,
}

impl KeyManager {
    /// Open a manager over `dir`, defaulting to `~/.ssh`.
    ///
    /// Ensures the SSH directory and the backup directory exist (mode
    /// 0o700 on Unix).
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let ssh_dir = match dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .ok_or(crate::error::Error::NoHomeDir)?
                .join(".ssh"),
        };

        let archive = BackupArchive::new(&ssh_dir);
        ensure_private_dir(&ssh_dir)?;
        ensure_private_dir(archive.dir())?;

        Ok(Self {
            state: StateStore::new(&ssh_dir),
            config: SshConfig::new(ssh_dir.join(CONFIG_FILE)),
            store: KeyStore::new(&ssh_dir),
            archive,
            ssh_dir,
        })
    }

    pub fn ssh_dir(&self) -> &Path {
        &self.ssh_dir
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn config(&self) -> &SshConfig {
        &self.config
    }

    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    pub fn archive(&self) -> &BackupArchive {
        &self.archive
    }

    /// All keys grouped by label (fresh scan).
    pub fn scan(&self) -> Result<BTreeMap<String, Vec<KeyInfo>>> {
        self.store.scan_all()
    }

    /// Path of the private key for an (algorithm, label) pair.
    pub fn key_path(&self, algorithm: Algorithm, label: &str) -> PathBuf {
        self.ssh_dir.join(naming::file_name_for(algorithm, label))
    }
}

fn ensure_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
