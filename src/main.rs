//! sshm - multi-account SSH key manager for Git hosting platforms.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sshm::cli::output;
use sshm::cli::{execute, Cli};
use sshm::error::{Error, KeyError, RepoError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("SSHM_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("sshm=debug")
        } else {
            EnvFilter::new("sshm=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    if let Err(e) = execute(cli.command, cli.dir) {
        let suggestion = match &e {
            Error::Key(KeyError::LabelNotFound(_)) | Error::Key(KeyError::NoDefaultKey) => {
                Some("run: sshm list")
            }
            Error::Key(KeyError::TargetExists(_)) => Some("pick another label, or remove it first"),
            Error::Repo(RepoError::NoOriginRemote) => Some("run: git remote add origin <url>"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
