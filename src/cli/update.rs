//! Update command.
//!
//! Reports release metadata only; downloading and replacing the binary is
//! left to the user.

use crate::cli::output;
use crate::core::update::UpdateChecker;
use crate::error::Result;

pub fn execute(check_only: bool, force: bool) -> Result<()> {
    output::section("Update check");

    let checker = UpdateChecker::new()?;
    output::kv("current", format!("v{}", checker.current_version()));

    match checker.check(force) {
        Some(release) => {
            output::kv("latest", &release.version);
            if !release.published_at.is_empty() {
                output::kv("published", &release.published_at);
            }
            println!();
            output::success(&format!("new version available: {}", release.version));

            if !check_only {
                if !release.notes.is_empty() {
                    println!();
                    output::header("Release notes");
                    for line in release.notes.lines().take(10) {
                        output::dimmed(&format!("  {line}"));
                    }
                }
                println!();
                output::kv("download", &release.download_url);
                output::hint("download the asset and replace the sshm binary");
            }
        }
        None => {
            println!();
            output::success("sshm is up to date");
        }
    }
    Ok(())
}
