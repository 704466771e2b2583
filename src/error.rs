//! Error types for sshm.
//!
//! Errors are grouped by subsystem and wrapped by a top-level [`Error`].
//! Read failures on the state document are deliberately *not* represented
//! here: corrupt or missing state is treated as empty state by design.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    SshConfig(#[from] SshConfigError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("unable to determine home directory")]
    NoHomeDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Errors from key lifecycle operations.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("unsupported key type: {0} (supported: ed25519, rsa, ecdsa, dsa)")]
    UnsupportedAlgorithm(String),

    #[error("key already exists: {0}")]
    AlreadyExists(String),

    #[error("no key found for label '{0}'")]
    LabelNotFound(String),

    #[error("key file missing: {0}")]
    FileMissing(String),

    #[error("no default key found")]
    NoDefaultKey,

    #[error("target label already exists: {0}")]
    TargetExists(String),

    #[error("the 'default' label cannot be renamed")]
    RenameDefault,

    #[error("'{0}' is a reserved label")]
    ReservedLabel(String),

    #[error("ssh-keygen not found in PATH")]
    KeygenNotFound,

    #[error("key generation failed: {0}")]
    GenerationFailed(String),
}

/// Errors from the active-key state store.
///
/// Only write failures surface as errors; reads degrade to empty state.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("failed to write state file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the SSH config block manager.
#[derive(Error, Debug)]
pub enum SshConfigError {
    #[error("failed to read ssh config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write ssh config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the backup archiver.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("failed to create backup directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {path} into backup: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from Git repository interactions.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("no 'origin' remote configured")]
    NoOriginRemote,

    #[error("git not found in PATH")]
    GitNotFound,

    #[error("git command failed: {0}")]
    GitFailed(String),

    #[error("unable to parse remote url: {0}")]
    UnparseableUrl(String),
}

pub type Result<T> = std::result::Result<T, Error>;
