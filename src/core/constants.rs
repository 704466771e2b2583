//! Constants used throughout sshm.
//!
//! Centralizes magic strings and configuration values.

/// State document name inside the SSH directory (.sshm_state).
pub const STATE_FILE: &str = ".sshm_state";

/// Backup directory name inside the SSH directory.
pub const BACKUP_DIR: &str = "key_backups";

/// SSH client configuration file name inside the SSH directory.
pub const CONFIG_FILE: &str = "config";

/// The distinguished label for the unlabeled canonical key.
pub const DEFAULT_LABEL: &str = "default";

/// Label under which the very first canonical key is preserved.
pub const ORIGINAL_LABEL: &str = "original";

/// Prefix every managed key file carries.
pub const KEY_FILE_PREFIX: &str = "id_";

/// Prefix of snapshot directory names (backup_<YYYYMMDD_HHMMSS>).
pub const SNAPSHOT_PREFIX: &str = "backup_";

/// Update-check cache file relative to HOME.
pub const UPDATE_CACHE_FILE: &str = ".sshm_update_cache";
