//! Repository commands: use, info, test.

use std::path::Path;

use dialoguer::Confirm;

use crate::cli::output;
use crate::core::manager::KeyManager;
use crate::error::Result;

/// Rewrite a repository's origin remote to route through a label's alias.
pub fn use_key(manager: &KeyManager, label: &str, path: &Path, yes: bool) -> Result<()> {
    let plan = manager.plan_remote(label, path)?;

    output::section(&format!("Configure repository key: {label}"));
    output::kv("repository", plan.repo_path.display());
    output::kv("current url", &plan.current_url);
    output::kv("platform", &plan.remote.platform);
    output::kv("owner", &plan.remote.owner);
    output::kv("repo", &plan.remote.repo);
    output::kv("new url", &plan.new_url);
    println!();

    if !yes
        && !Confirm::new()
            .with_prompt("Update the remote URL?")
            .default(false)
            .interact()?
    {
        output::warn("operation cancelled");
        return Ok(());
    }

    manager.apply_remote(&plan)?;
    output::success("remote url updated");

    println!();
    output::dimmed("testing ssh connection...");
    let outcome = crate::core::external::ssh::probe(&plan.alias);
    if outcome.success {
        output::success(&outcome.message);
    } else {
        output::warn(&outcome.message);
    }

    println!();
    output::hint(&format!("push with: {}", output::cmd("git push")));
    Ok(())
}

/// Show a repository's remote and the alias/key it routes through.
pub fn info(manager: &KeyManager, path: &Path) -> Result<()> {
    output::section("Repository SSH configuration");

    let info = manager.repo_info(path)?;
    output::kv("repository", info.repo_path.display());
    output::kv("remote url", &info.remote_url);

    if let Some(remote) = &info.remote {
        output::kv("platform", &remote.platform);
        output::kv("owner", &remote.owner);
        output::kv("repo", &remote.repo);
    } else {
        output::warn("unable to parse the remote url");
        return Ok(());
    }

    match &info.alias {
        Some(alias) => {
            println!();
            output::kv("alias", alias);
            match &info.key {
                Some(key) => {
                    output::kv("label", &key.label);
                    output::kv("type", key.algorithm);
                    output::kv("private", key.private_path.display());
                    output::kv("public", key.public_path.display());
                }
                None => output::warn("no key file matches this alias"),
            }
            if let Some(block) = &info.config_block {
                println!();
                output::header("SSH config block");
                for line in block.lines() {
                    output::dimmed(&format!("  {line}"));
                }
            }
        }
        None => {
            println!();
            if info.remote_url.starts_with("git@") {
                output::hint(&format!(
                    "standard ssh url in use; bind a key with: {}",
                    output::cmd("sshm use <label>")
                ));
            } else {
                output::hint(&format!(
                    "https url in use; convert it with: {}",
                    output::cmd("sshm use <label>")
                ));
            }
        }
    }
    Ok(())
}

/// Test SSH connectivity for a label, for every label, or for the
/// repository's configured remote.
pub fn test(manager: &KeyManager, label: Option<&str>, path: &Path, all: bool) -> Result<()> {
    if all {
        output::section("Testing all keys");

        let reports = manager.probe_all()?;
        if reports.is_empty() {
            output::warn("no keys found");
            return Ok(());
        }

        println!();
        for report in reports {
            let line = format!(
                "{:<16} ({:<24}) [{}]",
                report.label, report.alias, report.algorithms
            );
            if report.outcome.success {
                output::success(&line);
            } else {
                output::error(&line);
                output::dimmed(&format!("    {}", report.outcome.message));
            }
        }
        return Ok(());
    }

    if let Some(label) = label {
        output::section(&format!("Testing {label}"));

        let (alias, outcome) = manager.probe_label(label)?;
        output::kv("alias", &alias);
        println!();
        if outcome.success {
            output::success(&outcome.message);
        } else {
            output::error(&outcome.message);
            output::hint(&format!("inspect keys with: {}", output::cmd("sshm list")));
        }
        return Ok(());
    }

    output::section("Testing repository remote");
    let (remote_url, probed) = manager.probe_repo(path)?;
    output::kv("remote url", &remote_url);
    println!();

    match probed {
        Some((alias, outcome)) => {
            if outcome.success {
                output::success(&format!("{alias}: {}", outcome.message));
            } else {
                output::error(&format!("{alias}: {}", outcome.message));
                output::hint(&format!(
                    "check the configuration with: {}",
                    output::cmd("sshm info")
                ));
            }
        }
        None => {
            output::warn("the remote is not an ssh url; nothing to test");
            output::hint(&format!(
                "convert it with: {}",
                output::cmd("sshm use <label>")
            ));
        }
    }
    Ok(())
}
