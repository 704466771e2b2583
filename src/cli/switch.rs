//! Switch command.

use crate::cli::output;
use crate::core::manager::KeyManager;
use crate::core::naming::Algorithm;
use crate::error::Result;

/// Switch the default key for an algorithm to `label`.
pub fn execute(manager: &KeyManager, label: &str, algorithm: Option<Algorithm>) -> Result<()> {
    let outcome = manager.switch(label, algorithm)?;

    if outcome.detected {
        output::dimmed(&format!("detected key type: {}", outcome.algorithm));
    }
    if let Some(original) = &outcome.original_backup {
        output::dimmed(&format!("original key preserved as {original}"));
    }

    output::success(&format!(
        "switched to {} ({})",
        output::label(&outcome.label),
        outcome.algorithm
    ));
    output::kv(
        "file",
        outcome
            .target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    output::kv("alias", format!("{} -> {}", outcome.alias, outcome.hostname));
    output::hint(&format!("use it per repo: git@{}:user/repo.git", outcome.alias));
    Ok(())
}
