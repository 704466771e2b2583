//! Rename command.

use crate::cli::output;
use crate::core::manager::KeyManager;
use crate::core::naming::Algorithm;
use crate::error::Result;

/// Rename a label: files, config block, and state entries.
pub fn execute(
    manager: &KeyManager,
    old_label: &str,
    new_label: &str,
    algorithm: Option<Algorithm>,
) -> Result<()> {
    let (algorithm, old_alias, new_alias) = manager.rename(old_label, new_label, algorithm)?;

    output::success(&format!(
        "renamed {} -> {} ({})",
        output::label(old_label),
        output::label(new_label),
        algorithm
    ));
    output::dimmed(&format!("ssh config alias: {old_alias} -> {new_alias}"));
    Ok(())
}
