//! Key-pair generation via `ssh-keygen`.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::core::naming::Algorithm;
use crate::error::{KeyError, Result};

/// Generate a key pair at `output` (and `output.pub`).
///
/// Runs `ssh-keygen -t <algo> -C <email> -f <output> -N ''` (no
/// passphrase, comment set to the email). A non-zero exit is reported with
/// the captured diagnostic; there is no retry.
pub fn generate(algorithm: Algorithm, email: &str, output: &Path) -> Result<()> {
    let keygen = which::which("ssh-keygen").map_err(|_| KeyError::KeygenNotFound)?;

    debug!(%algorithm, output = %output.display(), "invoking ssh-keygen");
    let result = Command::new(keygen)
        .arg("-t")
        .arg(algorithm.as_str())
        .arg("-C")
        .arg(email)
        .arg("-f")
        .arg(output)
        .arg("-N")
        .arg("")
        .stdin(Stdio::null())
        .output()
        .map_err(|e| KeyError::GenerationFailed(e.to_string()))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(KeyError::GenerationFailed(stderr.trim().to_string()).into());
    }

    Ok(())
}
