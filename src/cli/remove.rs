//! Remove command.

use dialoguer::Confirm;

use crate::cli::output;
use crate::core::constants::DEFAULT_LABEL;
use crate::core::manager::KeyManager;
use crate::core::naming::{canonical_label, Algorithm};
use crate::error::Result;

/// Delete a key, with confirmation for the default label.
pub fn execute(manager: &KeyManager, label: &str, algorithm: Option<Algorithm>) -> Result<()> {
    if canonical_label(label) == DEFAULT_LABEL {
        let prompt = match algorithm {
            Some(algorithm) => format!("About to delete the default {algorithm} key. Continue?"),
            None => "About to delete all default keys. Continue?".to_string(),
        };
        if !Confirm::new().with_prompt(prompt).default(false).interact()? {
            output::warn("operation cancelled");
            return Ok(());
        }
    }

    let outcome = manager.remove(label, algorithm)?;

    if outcome.removed.is_empty() {
        output::warn(&format!("no key found for label '{label}'"));
        return Ok(());
    }

    if let Some(backup) = &outcome.backup {
        output::dimmed(&format!("backed up to {}", backup.display()));
    }

    output::success(&format!("removed {} file(s):", outcome.removed.len()));
    for name in &outcome.removed {
        output::list_item(name);
    }

    if let Some(alias) = &outcome.alias {
        output::dimmed(&format!("removed ssh config alias {alias}"));
    }
    for algorithm in &outcome.cleared {
        output::dimmed(&format!("cleared active {algorithm} key"));
    }
    Ok(())
}
