use crate::config::GitConfig;
use crate::error::{GitError, GitResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Variables that would point git at some other repository than `current_dir`
const REPOSITORY_ENV: [&str; 4] = ["GIT_DIR", "GIT_WORK_TREE", "GIT_INDEX_FILE", "GIT_COMMON_DIR"];

/// Anything that can produce the `git status` text for a repository path
///
/// The path is always passed explicitly; implementations must not rely on
/// the process working directory.
#[async_trait]
pub trait StatusRunner: Send + Sync {
    /// Run a status query scoped to `repo_path` and return its complete stdout
    async fn run_status(&self, repo_path: &Path) -> GitResult<String>;
}

/// Runs the real `git status` binary
#[derive(Debug, Clone)]
pub struct GitStatusRunner {
    program: PathBuf,
    timeout: Duration,
}

impl GitStatusRunner {
    /// Create a runner for the given git binary with a per-query timeout
    pub fn new<P: Into<PathBuf>>(program: P, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &GitConfig) -> Self {
        Self::new(config.program.clone(), Duration::from_secs(config.timeout_seconds))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, repo_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);

        // `--long` overrides `status.short` and friends in the user's config,
        // and the C locale keeps the phrases untranslated
        cmd.args(["status", "--long"])
            .current_dir(repo_path)
            .env("LC_ALL", "C")
            .env("LANG", "C");
        for var in REPOSITORY_ENV {
            cmd.env_remove(var);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn check_output(&self, output: Output, repo_path: &Path) -> GitResult<String> {
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed(format!(
                "'{} status' in {} failed with exit code {}: {}",
                self.program.display(),
                repo_path.display(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitStatusRunner {
    fn default() -> Self {
        Self::from_config(&GitConfig::default())
    }
}

#[async_trait]
impl StatusRunner for GitStatusRunner {
    async fn run_status(&self, repo_path: &Path) -> GitResult<String> {
        debug!(path = %repo_path.display(), "running git status");

        let child = self.command(repo_path).spawn().map_err(|e| {
            GitError::CommandFailed(format!("Failed to execute {}: {}", self.program.display(), e))
        })?;

        // Dropping the wait future on timeout kills the child
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| GitError::Timeout {
                path: repo_path.to_path_buf(),
                seconds: self.timeout.as_secs(),
            })??;

        self.check_output(output, repo_path)
    }
}
