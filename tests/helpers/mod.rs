#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn git(repo_path: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Helper to initialise a git repository at `repo_path`, creating it if needed
pub fn init_repo_at(repo_path: &Path) {
    fs::create_dir_all(repo_path).expect("Failed to create repo dir");

    git(repo_path, &["init", "-q"]);
    git(repo_path, &["config", "user.name", "Test User"]);
    git(repo_path, &["config", "user.email", "test@example.com"]);
    git(repo_path, &["config", "commit.gpgsign", "false"]);
}

/// Helper to create a test git repository
pub fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().to_path_buf();

    init_repo_at(&repo_path);

    (temp_dir, repo_path)
}

/// Helper to create a commit
pub fn create_commit(repo_path: &Path, file: &str, content: &str, message: &str) {
    fs::write(repo_path.join(file), content).expect("Failed to write file");

    git(repo_path, &["add", file]);
    git(repo_path, &["commit", "-q", "-m", message]);
}

/// Helper to create a repository with one commit, so `git status` reports it clean
pub fn create_clean_repo_at(repo_path: &Path) {
    init_repo_at(repo_path);
    create_commit(repo_path, "README.md", "hello", "Initial commit");
}

/// Helper to set a repository-local config value
pub fn git_config(repo_path: &Path, key: &str, value: &str) {
    git(repo_path, &["config", key, value]);
}

/// Helper to rename a tracked file through the index
pub fn git_mv(repo_path: &Path, from: &str, to: &str) {
    git(repo_path, &["mv", from, to]);
}
