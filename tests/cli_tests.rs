//! CLI-level integration tests.
//!
//! Everything here runs against fake key files in an isolated SSH
//! directory; no external tools (ssh-keygen, git, ssh) are needed.

mod support;

use support::{assert_stderr_contains, assert_stdout_contains, Test};

#[test]
fn list_reports_no_keys_on_empty_directory() {
    let t = Test::new();
    let output = t.list();
    assert!(output.status.success());
    assert_stdout_contains(&output, "no keys found");
    assert_stdout_contains(&output, "sshm add");
}

#[test]
fn list_shows_labels_and_aliases() {
    let t = Test::new();
    t.write_key_pair("id_ed25519.github", "aaa");
    t.write_key_pair("id_rsa.work", "bbb");
    t.write_key("id_ed25519", "ccc");

    let output = t.list();
    assert!(output.status.success());
    assert_stdout_contains(&output, "GITHUB");
    assert_stdout_contains(&output, "WORK");
    assert_stdout_contains(&output, "DEFAULT (default)");
    assert_stdout_contains(&output, "git@github-github:user/repo.git");
    assert_stdout_contains(&output, "git@github-work:user/repo.git");
}

#[test]
fn list_all_shows_public_key_contents() {
    let t = Test::new();
    t.write_key_pair("id_ed25519.github", "aaa");

    let output = t.cmd().args(["list", "--all"]).output().unwrap();
    assert!(output.status.success());
    assert_stdout_contains(&output, "ssh-ed25519 aaa test@host");
}

#[test]
fn switch_unknown_label_fails() {
    let t = Test::new();
    let output = t.switch("nope");
    assert!(!output.status.success());
    assert_stderr_contains(&output, "no key found for label 'nope'");
}

#[test]
fn switch_activates_key_and_writes_config_block() {
    let t = Test::new();
    t.write_key_pair("id_ed25519.github", "github-key");

    let output = t.switch("github");
    assert!(
        output.status.success(),
        "switch failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_stdout_contains(&output, "switched to github");

    // Canonical files were created from the labeled key.
    assert_eq!(t.read("id_ed25519"), "github-key");
    assert!(t.exists("id_ed25519.pub"));

    // No prior canonical key existed, so nothing was preserved.
    assert!(!t.exists("id_ed25519.original"));

    // State records the active label.
    let state = t.read(".sshm_state");
    assert!(state.contains("\"ed25519\""));
    assert!(state.contains("\"github\""));

    // The config block routes the alias at the labeled key.
    let config = t.read("config");
    assert!(config.contains("# github-github - Auto-generated by sshm"));
    assert!(config.contains("Host github-github"));
    assert!(config.contains("HostName github.com"));
    assert!(config.contains("IdentitiesOnly yes"));
}

#[test]
fn switch_is_case_insensitive() {
    let t = Test::new();
    t.write_key_pair("id_ed25519.github", "github-key");

    let output = t.switch("GitHub");
    assert!(output.status.success());
    assert_eq!(t.read("id_ed25519"), "github-key");
}

#[test]
fn rename_default_is_forbidden() {
    let t = Test::new();
    t.write_key("id_ed25519", "key");

    let output = t.rename("default", "other");
    assert!(!output.status.success());
    assert_stderr_contains(&output, "'default' label cannot be renamed");
}

#[test]
fn rename_missing_label_fails() {
    let t = Test::new();
    let output = t.rename("ghost", "other");
    assert!(!output.status.success());
    assert_stderr_contains(&output, "no key found for label 'ghost'");
}

#[test]
fn rename_moves_files_and_config_block() {
    let t = Test::new();
    t.write_key_pair("id_ed25519.github", "key");
    assert!(t.switch("github").status.success());

    let output = t.rename("github", "work");
    assert!(output.status.success());
    assert_stdout_contains(&output, "renamed github -> work");

    assert!(!t.exists("id_ed25519.github"));
    assert!(t.exists("id_ed25519.work"));
    assert!(t.exists("id_ed25519.work.pub"));

    let config = t.read("config");
    assert!(!config.contains("github-github"));
    assert!(config.contains("Host github-work"));

    let state = t.read(".sshm_state");
    assert!(state.contains("\"work\""));
}

#[test]
fn rename_refuses_existing_target() {
    let t = Test::new();
    t.write_key_pair("id_ed25519.github", "one");
    t.write_key_pair("id_ed25519.work", "two");

    let output = t.rename("github", "work");
    assert!(!output.status.success());
    assert_stderr_contains(&output, "target label already exists: work");
}

#[test]
fn remove_unknown_label_warns_but_succeeds() {
    let t = Test::new();
    let output = t.remove("ghost");
    assert!(output.status.success());
    assert_stdout_contains(&output, "no key found for label 'ghost'");
}

#[test]
fn tag_without_default_key_fails() {
    let t = Test::new();
    let output = t.cmd().args(["tag", "backup"]).output().unwrap();
    assert!(!output.status.success());
    assert_stderr_contains(&output, "no default key found");
}

#[test]
fn tag_copies_canonical_key() {
    let t = Test::new();
    t.write_key_pair("id_ed25519", "canonical");

    let output = t.cmd().args(["tag", "mirror"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(t.read("id_ed25519.mirror"), "canonical");
    assert!(t.exists("id_ed25519.mirror.pub"));
}

#[test]
fn backup_and_backups_round_trip() {
    let t = Test::new();
    t.write_key_pair("id_ed25519.github", "key");

    let output = t.backup();
    assert!(output.status.success());
    assert_stdout_contains(&output, "backed up 2 file(s)");

    let output = t.backups();
    assert!(output.status.success());
    assert_stdout_contains(&output, "backup_");
    assert_stdout_contains(&output, "files");
}

#[test]
fn backups_is_empty_initially() {
    let t = Test::new();
    let output = t.backups();
    assert!(output.status.success());
    assert_stdout_contains(&output, "no backups yet");
}

#[test]
fn info_outside_a_repository_fails() {
    let t = Test::new();
    let output = t
        .cmd()
        .args(["info", "--path"])
        .arg(t.home.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_stderr_contains(&output, "not a git repository");
}

#[test]
fn use_outside_a_repository_fails() {
    let t = Test::new();
    let output = t
        .cmd()
        .args(["use", "ghost", "--path"])
        .arg(t.home.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_stderr_contains(&output, "not a git repository");
}

#[test]
fn completions_generate_for_bash() {
    let t = Test::new();
    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert!(output.status.success());
    assert_stdout_contains(&output, "sshm");
}

#[test]
fn unknown_subcommand_fails() {
    let t = Test::new();
    let output = t.cmd().arg("frobnicate").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn version_flag_prints_version() {
    let t = Test::new();
    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("sshm"));
}
