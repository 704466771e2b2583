//! Backup archiver.
//!
//! Snapshots the key directory and state document into a timestamp-named
//! folder under the backup directory. Snapshots are immutable after
//! creation; a failed copy aborts the triggering operation instead of
//! leaving a silently partial backup.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::core::constants::{BACKUP_DIR, KEY_FILE_PREFIX, SNAPSHOT_PREFIX, STATE_FILE};
use crate::error::{BackupError, Result};

/// A snapshot that was just taken.
pub struct Snapshot {
    pub path: PathBuf,
    pub file_count: usize,
}

/// Metadata of an existing snapshot.
pub struct SnapshotInfo {
    pub name: String,
    pub path: PathBuf,
    pub modified: DateTime<Local>,
    pub file_count: usize,
}

/// Archiver over `<ssh_dir>/key_backups`.
pub struct BackupArchive {
    ssh_dir: PathBuf,
    backup_dir: PathBuf,
}

impl BackupArchive {
    pub fn new(ssh_dir: &Path) -> Self {
        Self {
            ssh_dir: ssh_dir.to_path_buf(),
            backup_dir: ssh_dir.join(BACKUP_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy every key file and the state document into a fresh
    /// `backup_<YYYYMMDD_HHMMSS>` directory.
    ///
    /// Same-second collisions reuse the directory; that is a caller
    /// concern, not handled here.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.backup_dir.join(format!("{SNAPSHOT_PREFIX}{timestamp}"));

        fs::create_dir_all(&path).map_err(|source| BackupError::CreateDir {
            path: path.clone(),
            source,
        })?;
        restrict_permissions(&path);

        let mut file_count = 0;
        for entry in fs::read_dir(&self.ssh_dir)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with(KEY_FILE_PREFIX) || !entry.file_type()?.is_file() {
                continue;
            }
            copy_into(&entry.path(), &path.join(&name))?;
            file_count += 1;
        }

        let state = self.ssh_dir.join(STATE_FILE);
        if state.exists() {
            copy_into(&state, &path.join(STATE_FILE))?;
        }

        debug!(path = %path.display(), file_count, "snapshot complete");
        Ok(Snapshot { path, file_count })
    }

    /// All snapshots, newest first by modification time.
    ///
    /// The directory is re-read on every call; nothing is cached.
    pub fn list(&self) -> Result<Vec<SnapshotInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with(SNAPSHOT_PREFIX) || !entry.file_type()?.is_dir() {
                continue;
            }

            let path = entry.path();
            let modified = entry
                .metadata()?
                .modified()
                .map(DateTime::<Local>::from)
                .unwrap_or_else(|_| Local::now());
            let file_count = fs::read_dir(&path)?
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().starts_with(KEY_FILE_PREFIX))
                .count();

            snapshots.push(SnapshotInfo {
                name,
                path,
                modified,
                file_count,
            });
        }

        snapshots.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(snapshots)
    }
}

fn copy_into(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map_err(|source| BackupError::Copy {
        path: from.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o700));
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "data").unwrap();
    }

    #[test]
    fn snapshot_copies_keys_and_state() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "id_ed25519");
        touch(tmp.path(), "id_ed25519.pub");
        touch(tmp.path(), "id_rsa.work");
        touch(tmp.path(), STATE_FILE);
        touch(tmp.path(), "known_hosts");

        let archive = BackupArchive::new(tmp.path());
        let snapshot = archive.snapshot().unwrap();

        assert_eq!(snapshot.file_count, 3);
        assert!(snapshot.path.join("id_ed25519").exists());
        assert!(snapshot.path.join("id_ed25519.pub").exists());
        assert!(snapshot.path.join("id_rsa.work").exists());
        assert!(snapshot.path.join(STATE_FILE).exists());
        assert!(!snapshot.path.join("known_hosts").exists());
    }

    #[test]
    fn list_is_empty_without_backup_dir() {
        let tmp = TempDir::new().unwrap();
        let archive = BackupArchive::new(tmp.path());
        assert!(archive.list().unwrap().is_empty());
    }

    #[test]
    fn list_reports_snapshots_with_counts() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "id_ed25519");
        touch(tmp.path(), "id_ed25519.pub");

        let archive = BackupArchive::new(tmp.path());
        archive.snapshot().unwrap();

        let listed = archive.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].name.starts_with(SNAPSHOT_PREFIX));
        assert_eq!(listed[0].file_count, 2);
    }
}
