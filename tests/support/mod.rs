//! Test support utilities for sshm integration tests.
//!
//! Provides an isolated SSH directory per test plus helper commands.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own temporary home and SSH directory. No
/// process-global state is mutated — child processes get `SSHM_DIR` and
/// `HOME` through the environment, so tests can safely run in parallel.
pub struct Test {
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        fs::create_dir_all(home.path().join(".ssh")).expect("failed to create ssh dir");
        Self { home }
    }

    /// The isolated SSH directory.
    pub fn ssh_dir(&self) -> PathBuf {
        self.home.path().join(".ssh")
    }

    /// Create an sshm command with correct environment variables.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("sshm").expect("failed to find sshm binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("SSHM_DIR", self.ssh_dir());
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Write a fake private key file into the SSH directory.
    pub fn write_key(&self, name: &str, contents: &str) {
        fs::write(self.ssh_dir().join(name), contents).expect("failed to write key");
    }

    /// Write a fake private/public key pair into the SSH directory.
    pub fn write_key_pair(&self, name: &str, contents: &str) {
        self.write_key(name, contents);
        self.write_key(&format!("{name}.pub"), &format!("ssh-ed25519 {contents} test@host"));
    }

    /// Read a file from the SSH directory.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.ssh_dir().join(name)).expect("failed to read file")
    }

    /// Whether a file exists in the SSH directory.
    pub fn exists(&self, name: &str) -> bool {
        self.ssh_dir().join(name).exists()
    }

    /// Shortcut for `sshm list`.
    pub fn list(&self) -> Output {
        self.cmd().arg("list").output().expect("failed to run sshm list")
    }

    /// Shortcut for `sshm switch`.
    pub fn switch(&self, label: &str) -> Output {
        self.cmd()
            .args(["switch", label])
            .output()
            .expect("failed to run sshm switch")
    }

    /// Shortcut for `sshm backup`.
    pub fn backup(&self) -> Output {
        self.cmd().arg("backup").output().expect("failed to run sshm backup")
    }

    /// Shortcut for `sshm backups`.
    pub fn backups(&self) -> Output {
        self.cmd().arg("backups").output().expect("failed to run sshm backups")
    }

    /// Shortcut for `sshm remove` (non-interactive labels only).
    pub fn remove(&self, label: &str) -> Output {
        self.cmd()
            .args(["remove", label])
            .output()
            .expect("failed to run sshm remove")
    }

    /// Shortcut for `sshm rename`.
    pub fn rename(&self, old: &str, new: &str) -> Output {
        self.cmd()
            .args(["rename", old, new])
            .output()
            .expect("failed to run sshm rename")
    }
}

/// Assert that stdout of an output contains a substring.
pub fn assert_stdout_contains(output: &Output, needle: &str) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(needle),
        "stdout did not contain {needle:?}:\n{stdout}"
    );
}

/// Assert that stderr of an output contains a substring.
pub fn assert_stderr_contains(output: &Output, needle: &str) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(needle),
        "stderr did not contain {needle:?}:\n{stderr}"
    );
}

/// Count snapshot directories in the backup dir.
pub fn snapshot_count(ssh_dir: &Path) -> usize {
    let backups = ssh_dir.join("key_backups");
    if !backups.exists() {
        return 0;
    }
    fs::read_dir(backups)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("backup_"))
        .count()
}
