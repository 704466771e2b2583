//! Tag command.

use dialoguer::Confirm;

use crate::cli::output;
use crate::core::manager::KeyManager;
use crate::core::naming::Algorithm;
use crate::error::{Error, KeyError, Result};

/// Copy the canonical key to a new label, optionally switching to it.
pub fn execute(
    manager: &KeyManager,
    label: &str,
    algorithm: Option<Algorithm>,
    switch_after: bool,
) -> Result<()> {
    let outcome = match manager.tag(algorithm, label, false) {
        Err(Error::Key(KeyError::TargetExists(existing))) => {
            output::warn(&format!("label already exists: {existing}"));
            if !Confirm::new()
                .with_prompt("Overwrite?")
                .default(false)
                .interact()?
            {
                output::warn("operation cancelled");
                return Ok(());
            }
            manager.tag(algorithm, label, true)?
        }
        other => other?,
    };

    output::success(&format!(
        "tagged {} ({})",
        output::label(label),
        outcome.algorithm
    ));

    if switch_after {
        crate::cli::switch::execute(manager, label, Some(outcome.algorithm))?;
    }
    Ok(())
}
