//! Command-line interface.

pub mod add;
pub mod backup;
pub mod completions;
pub mod list;
pub mod output;
pub mod remove;
pub mod rename;
pub mod repo;
pub mod switch;
pub mod tag;
pub mod update;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::core::manager::KeyManager;
use crate::core::naming::Algorithm;
use crate::core::update::UpdateChecker;

/// sshm - multi-account SSH key manager for Git hosting platforms.
#[derive(Parser)]
#[command(
    name = "sshm",
    about = "Multi-account SSH key manager for Git hosting platforms",
    version,
    after_help = "One host, many keys. 🔑"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// SSH directory (defaults to ~/.ssh)
    #[arg(long, global = true, env = "SSHM_DIR", value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// List all SSH keys
    List {
        /// Also show public key contents
        #[arg(short, long)]
        all: bool,
    },

    /// Back up all keys and the state file
    Backup,

    /// List existing backups
    Backups,

    /// Create a new labeled SSH key
    Add {
        /// Key label (e.g. github, work)
        label: String,
        /// Email address used as the key comment
        email: String,
        /// Key type
        #[arg(short = 't', long = "type", value_enum, default_value_t = Algorithm::Ed25519)]
        algorithm: Algorithm,
        /// Hostname for an SSH config block (e.g. github.com)
        #[arg(short = 'H', long)]
        host: Option<String>,
    },

    /// Switch the default SSH key
    Switch {
        /// Key label
        label: String,
        /// Key type (auto-detected when omitted)
        #[arg(short = 't', long = "type", value_enum)]
        algorithm: Option<Algorithm>,
    },

    /// Remove an SSH key
    Remove {
        /// Key label
        label: String,
        /// Key type (all types when omitted)
        #[arg(short = 't', long = "type", value_enum)]
        algorithm: Option<Algorithm>,
    },

    /// Label the current default key
    Tag {
        /// New label name
        label: String,
        /// Key type (auto-detected when omitted)
        #[arg(short = 't', long = "type", value_enum)]
        algorithm: Option<Algorithm>,
        /// Switch to the new label right away
        #[arg(short, long)]
        switch: bool,
    },

    /// Rename a key label
    Rename {
        /// Current label
        old_label: String,
        /// New label
        new_label: String,
        /// Key type (auto-detected when omitted)
        #[arg(short = 't', long = "type", value_enum)]
        algorithm: Option<Algorithm>,
    },

    /// Configure a Git repository to use a specific key
    Use {
        /// Key label
        label: String,
        /// Git repository path
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a Git repository's SSH configuration
    Info {
        /// Git repository path
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    /// Test SSH connectivity
    Test {
        /// Key label (tests the current repository when omitted)
        label: Option<String>,
        /// Git repository path
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Test every key
        #[arg(short, long)]
        all: bool,
    },

    /// Check for a newer release
    Update {
        /// Only check, do not report download details
        #[arg(long)]
        check: bool,
        /// Ignore the cached check result
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute a command.
pub fn execute(command: Command, dir: Option<PathBuf>) -> crate::error::Result<()> {
    use Command::*;

    let notify_after = !matches!(command, Update { .. } | Completions { .. });

    match command {
        List { all } => list::execute(&KeyManager::new(dir)?, all)?,
        Backup => backup::backup(&KeyManager::new(dir)?)?,
        Backups => backup::backups(&KeyManager::new(dir)?)?,
        Add {
            label,
            email,
            algorithm,
            host,
        } => add::execute(&KeyManager::new(dir)?, &label, &email, algorithm, host.as_deref())?,
        Switch { label, algorithm } => switch::execute(&KeyManager::new(dir)?, &label, algorithm)?,
        Remove { label, algorithm } => remove::execute(&KeyManager::new(dir)?, &label, algorithm)?,
        Tag {
            label,
            algorithm,
            switch,
        } => tag::execute(&KeyManager::new(dir)?, &label, algorithm, switch)?,
        Rename {
            old_label,
            new_label,
            algorithm,
        } => rename::execute(&KeyManager::new(dir)?, &old_label, &new_label, algorithm)?,
        Use { label, path, yes } => repo::use_key(&KeyManager::new(dir)?, &label, &path, yes)?,
        Info { path } => repo::info(&KeyManager::new(dir)?, &path)?,
        Test { label, path, all } => repo::test(&KeyManager::new(dir)?, label.as_deref(), &path, all)?,
        Update { check, force } => update::execute(check, force)?,
        Completions { shell } => completions::execute(shell),
    }

    if notify_after {
        notify_update();
    }
    Ok(())
}

/// Best-effort update notice from the cached check result.
///
/// Never touches the network and never fails the command.
fn notify_update() {
    match UpdateChecker::new() {
        Ok(checker) => {
            if let Some(release) = checker.cached_update() {
                println!();
                output::hint(&format!(
                    "new version available: {} (current: v{}); run sshm update",
                    release.version,
                    checker.current_version()
                ));
            }
        }
        Err(e) => debug!(error = %e, "update notice skipped"),
    }
}
