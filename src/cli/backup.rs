//! Backup commands: take a snapshot, list snapshots.

use crate::cli::output;
use crate::core::manager::KeyManager;
use crate::error::Result;

/// Take a snapshot of every key and the state file.
pub fn backup(manager: &KeyManager) -> Result<()> {
    let snapshot = manager.archive().snapshot()?;
    output::success(&format!(
        "backed up {} file(s) to {}",
        snapshot.file_count,
        output::path(&snapshot.path.display().to_string())
    ));
    Ok(())
}

/// List existing snapshots, newest first.
pub fn backups(manager: &KeyManager) -> Result<()> {
    output::section("Backups");

    let snapshots = manager.archive().list()?;
    if snapshots.is_empty() {
        output::dimmed("no backups yet");
        output::hint(&format!("take one with: {}", output::cmd("sshm backup")));
        return Ok(());
    }

    for (i, snapshot) in snapshots.iter().enumerate() {
        println!();
        output::header(&format!("[{}] {}", i + 1, snapshot.name));
        output::kv("taken", snapshot.modified.format("%Y-%m-%d %H:%M:%S"));
        output::kv("files", snapshot.file_count);
        output::kv("path", snapshot.path.display());
    }
    Ok(())
}
