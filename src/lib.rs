//! sshm - multi-account SSH key manager for Git hosting platforms.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── list          # Key listing
//! │   ├── backup        # Snapshots and snapshot listing
//! │   ├── add           # Key creation
//! │   ├── switch        # Active-key switching
//! │   ├── remove        # Key deletion
//! │   ├── tag           # Label the canonical key
//! │   ├── rename        # Label renaming
//! │   ├── repo          # use / info / test (Git-remote binding)
//! │   ├── update        # Release-metadata check
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── naming        # (algorithm, label) <-> file name scheme
//!     ├── state         # Active-key state store (JSON)
//!     ├── ssh_config    # Generated blocks in the SSH config file
//!     ├── keystore      # Key repository (scan/group/detect)
//!     ├── backup        # Timestamped key snapshots
//!     ├── hosts         # Host aliases and Git URL parsing
//!     ├── manager       # Lifecycle orchestrator
//!     ├── external      # ssh-keygen / git / ssh collaborators
//!     └── update        # Release-metadata check
//! ```
//!
//! # Features
//!
//! - Labeled key pairs per algorithm, switchable in one command
//! - Generated SSH config blocks beside hand-edited content
//! - Automatic backups before every destructive operation
//! - Per-repository key selection through rewritten remote URLs

pub mod cli;
pub mod core;
pub mod error;
