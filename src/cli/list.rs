//! List command.

use std::collections::BTreeSet;
use std::fs;

use crate::cli::output;
use crate::core::constants::DEFAULT_LABEL;
use crate::core::hosts;
use crate::core::keystore::KeyInfo;
use crate::core::manager::KeyManager;
use crate::error::Result;

/// List every key, grouped by label.
///
/// Active labels sort first, then `default`, then the rest alphabetically.
pub fn execute(manager: &KeyManager, show_all: bool) -> Result<()> {
    output::section("SSH Keys");
    output::kv("directory", manager.ssh_dir().display());

    let keys = manager.scan()?;
    let active = manager.state().read_active();

    if keys.is_empty() {
        println!();
        output::warn("no keys found");
        output::hint(&format!(
            "create one with: {}",
            output::cmd("sshm add <label> <email>")
        ));
        return Ok(());
    }

    let active_labels: BTreeSet<&String> = active.values().collect();
    let mut labels: Vec<&String> = keys.keys().collect();
    labels.sort_by_key(|label| {
        let priority = if active_labels.contains(label) {
            0
        } else if label.as_str() == DEFAULT_LABEL {
            1
        } else {
            2
        };
        (priority, label.as_str())
    });

    for label in labels {
        let infos = &keys[label];
        let is_active = infos
            .iter()
            .any(|key| active.get(&key.algorithm).map(String::as_str) == Some(label.as_str()));

        println!();
        if is_active {
            output::header(&format!("{} (active)", label.to_uppercase()));
        } else if label.as_str() == DEFAULT_LABEL {
            output::header(&format!("{} (default)", label.to_uppercase()));
        } else {
            output::header(&label.to_uppercase());
        }
        output::rule();

        for key in infos {
            print_key(label, key, &active, show_all);
        }
    }

    println!();
    output::hint(&format!(
        "switch keys with: {}",
        output::cmd("sshm switch <label>")
    ));
    Ok(())
}

fn print_key(
    label: &str,
    key: &KeyInfo,
    active: &std::collections::BTreeMap<crate::core::naming::Algorithm, String>,
    show_all: bool,
) {
    let private_name = key
        .private_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    output::kv("type", key.algorithm);
    output::kv("private", &private_name);
    output::kv(
        "public",
        if key.has_public {
            format!("{private_name}.pub")
        } else {
            format!("{private_name}.pub (missing)")
        },
    );
    output::kv("size", format!("{} bytes", key.size));
    output::kv("modified", key.modified.format("%Y-%m-%d %H:%M:%S"));
    output::kv(
        "alias",
        format!("git@{}:user/repo.git", hosts::host_alias(label)),
    );

    if active.get(&key.algorithm).map(String::as_str) == Some(label) {
        output::kv("status", format!("in use (default {} key)", key.algorithm));
    } else {
        output::kv("status", "unused");
    }

    if show_all && key.has_public {
        if let Ok(public) = fs::read_to_string(&key.public_path) {
            println!();
            output::dimmed(&format!("  {}", public.trim()));
            println!();
        }
    }
}
