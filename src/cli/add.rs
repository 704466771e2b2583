//! Add command.

use crate::cli::output;
use crate::core::manager::KeyManager;
use crate::core::naming::Algorithm;
use crate::error::Result;

/// Create a new labeled key pair.
pub fn execute(
    manager: &KeyManager,
    label: &str,
    email: &str,
    algorithm: Algorithm,
    host: Option<&str>,
) -> Result<()> {
    println!(
        "creating key {} ({}) for {}",
        output::label(label),
        algorithm,
        email
    );

    let outcome = manager.add(label, email, algorithm, host)?;

    output::success(&format!(
        "key created: {}",
        outcome
            .private_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    ));

    if let Some((alias, hostname)) = &outcome.config {
        output::success(&format!("ssh config updated: Host {alias} -> {hostname}"));
    }

    if let Some(public_key) = &outcome.public_key {
        println!();
        output::header("Public key");
        println!("{public_key}");
        println!();
        output::hint("add this public key to your Git platform (GitHub/GitLab/...)");
    }

    Ok(())
}
