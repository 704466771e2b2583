//! One-shot SSH authentication probe.
//!
//! Runs `ssh -T git@<alias>` under a fixed timeout and classifies the
//! combined output. Probe failures are outcomes, never errors: connection
//! problems are non-essential to core correctness and degrade to a
//! reported message.

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

/// Fixed probe timeout.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// How much captured output a failure diagnostic carries.
const DIAGNOSTIC_LIMIT: usize = 100;

/// Result of one authentication probe.
pub struct ProbeOutcome {
    pub success: bool,
    pub message: String,
}

impl ProbeOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Probe `git@<alias>` with `ssh -T`.
///
/// Success is inferred from well-known greeting substrings, or from exit
/// code 1 without "permission denied" (some hosts exit 1 on successful
/// auth because no shell is granted).
pub fn probe(alias: &str) -> ProbeOutcome {
    let Ok(bin) = which::which("ssh") else {
        return ProbeOutcome::failure("ssh not found in PATH");
    };

    debug!(alias, "probing ssh authentication");
    let child = Command::new(bin)
        .arg("-T")
        .arg(format!("git@{alias}"))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => return ProbeOutcome::failure(format!("failed to run ssh: {e}")),
    };

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= PROBE_TIMEOUT {
                    let _ = child.kill();
                    let _ = child.wait();
                    return ProbeOutcome::failure("connection timed out");
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return ProbeOutcome::failure(format!("failed to wait for ssh: {e}")),
        }
    };

    let mut output = String::new();
    if let Some(mut stdout) = child.stdout.take() {
        let _ = stdout.read_to_string(&mut output);
    }
    if let Some(mut stderr) = child.stderr.take() {
        let _ = stderr.read_to_string(&mut output);
    }

    classify(status.code(), &output)
}

fn classify(code: Option<i32>, output: &str) -> ProbeOutcome {
    let lowered = output.to_lowercase();

    if lowered.contains("successfully authenticated") {
        let who = output
            .split('\n')
            .find_map(|line| {
                let rest = line.trim().strip_prefix("Hi ")?;
                rest.split('!').next()
            })
            .unwrap_or("User");
        return ProbeOutcome {
            success: true,
            message: format!("authenticated (Hi {who}!)"),
        };
    }

    if lowered.contains("welcome to") {
        return ProbeOutcome {
            success: true,
            message: "connected".to_string(),
        };
    }

    if code == Some(1) && !lowered.contains("permission denied") {
        return ProbeOutcome {
            success: true,
            message: "connected".to_string(),
        };
    }

    let diagnostic: String = output.trim().chars().take(DIAGNOSTIC_LIMIT).collect();
    ProbeOutcome::failure(format!("connection failed: {diagnostic}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_greeting_is_success() {
        let outcome = classify(
            Some(1),
            "Hi octocat! You've successfully authenticated, but GitHub does not provide shell access.\n",
        );
        assert!(outcome.success);
        assert!(outcome.message.contains("Hi octocat!"));
    }

    #[test]
    fn welcome_greeting_is_success() {
        let outcome = classify(Some(0), "Welcome to GitLab, @dev!\n");
        assert!(outcome.success);
    }

    #[test]
    fn exit_one_without_denial_is_success() {
        let outcome = classify(Some(1), "shell access is not granted\n");
        assert!(outcome.success);
    }

    #[test]
    fn permission_denied_is_failure() {
        let outcome = classify(Some(255), "git@github.com: Permission denied (publickey).\n");
        assert!(!outcome.success);
        assert!(outcome.message.contains("Permission denied"));
    }

    #[test]
    fn diagnostic_is_truncated() {
        let long = "x".repeat(500);
        let outcome = classify(Some(255), &long);
        assert!(!outcome.success);
        assert!(outcome.message.len() < 150);
    }
}
