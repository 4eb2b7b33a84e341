// tests/integration_test.rs
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn git_semver(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-semver"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute git-semver")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

/// Empty config file, so the user's own config never leaks into a test
fn default_config(dir: &Path) -> String {
    let path = dir.join("empty.toml");
    std::fs::write(&path, "").unwrap();
    path.to_str().unwrap().to_string()
}

fn init_repo(dir: &Path) {
    let repo = git2::Repository::init(dir).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Cli Tester").unwrap();
    config.set_str("user.email", "cli@example.com").unwrap();

    let signature = git2::Signature::now("Cli Tester", "cli@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
        .unwrap();
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    let output = git_semver(&["--help"], dir.path());

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("git-semver"));
    assert!(text.contains("Parse, bump and tag semantic versions"));
}

#[test]
fn test_bump_command() {
    let dir = TempDir::new().unwrap();
    let config = default_config(dir.path());
    let config = config.as_str();

    let output = git_semver(
        &[
            "--config",
            config,
            "bump",
            "v1.2.3-beta.4+sha899d8g79f87",
            "--kind",
            "major",
        ],
        dir.path(),
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "v2.2.3");

    // patch is the built-in default
    let output = git_semver(&["--config", config, "bump", "0.0.0"], dir.path());
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0.0.1");

    let output = git_semver(
        &["--config", config, "bump", "1.2.3", "--kind", "minor", "--amount", "-3"],
        dir.path(),
    );
    assert!(!output.status.success());
}

#[test]
fn test_parse_command() {
    let dir = TempDir::new().unwrap();

    let output = git_semver(&["parse", "v3.4.5-beta.3"], dir.path());
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("major:       3"));
    assert!(text.contains("pre-release: beta.3"));

    let output = git_semver(&["parse", "1.2"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid format"));
}

#[test]
fn test_release_and_list() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let config = default_config(dir.path());

    let output = git_semver(
        &["--config", &config, "release", "v0.9.1-rc.1", "--kind", "minor"],
        dir.path(),
    );
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("Created tag: v0.10.1"));

    let output = git_semver(&["list"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("v0.10.1"));

    let output = git_semver(&["show", "v0.10.1"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("Release v0.10.1"));
}

#[test]
fn test_tag_dry_run() {
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let config = default_config(dir.path());

    let output = git_semver(&["--config", &config, "tag", "1.0.0", "--dry-run"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("Would create tag 1.0.0"));

    let repo = git2::Repository::open(dir.path()).unwrap();
    assert_eq!(repo.tag_names(None).unwrap().len(), 0);
}

#[test]
fn test_list_outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    let output = git_semver(&["list", "--repo", dir.path().to_str().unwrap()], dir.path());
    assert!(!output.status.success());
}
