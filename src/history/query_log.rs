//! Per-repository record of status queries.
//!
//! One line per query: when it finished, how long it took, what it found
//! and where. Useful for spotting repositories that are slow to query or
//! that keep failing across runs.

use crate::error::{GitError, GitResult};
use crate::git::{ChangeLabel, ConditionFlags};
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const FILE_NAME: &str = "queries.log";
const DEFAULT_LIMIT: u64 = 4 * 1024 * 1024;

/// What a single status query found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Clean,
    Dirty(Vec<ChangeLabel>),
    Timeout,
    Unknown,
}

impl QueryOutcome {
    pub fn from_result(result: &GitResult<ConditionFlags>) -> Self {
        match result {
            Ok(flags) if flags.clean => QueryOutcome::Clean,
            Ok(flags) => QueryOutcome::Dirty(flags.labels()),
            Err(GitError::Timeout { .. }) => QueryOutcome::Timeout,
            Err(_) => QueryOutcome::Unknown,
        }
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutcome::Clean => f.write_str("clean"),
            QueryOutcome::Dirty(labels) => {
                let names: Vec<&str> = labels.iter().map(ChangeLabel::as_str).collect();
                write!(f, "dirty:{}", names.join(","))
            }
            QueryOutcome::Timeout => f.write_str("timeout"),
            QueryOutcome::Unknown => f.write_str("unknown"),
        }
    }
}

/// Append-only query log with a single previous generation kept as `.old`
#[derive(Debug, Clone)]
pub struct QueryLog {
    path: PathBuf,
    limit: u64,
}

impl QueryLog {
    /// Open the log next to the config file, under `~/.config/repostat`
    pub fn open_default() -> io::Result<Self> {
        let home = std::env::var_os("HOME")
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "HOME is not set"))?;
        Self::open(PathBuf::from(home).join(".config/repostat").join(FILE_NAME))
    }

    /// Open (and create the parent directory of) a log at `path`
    pub fn open<P: Into<PathBuf>>(path: P) -> io::Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        Ok(Self {
            path,
            limit: DEFAULT_LIMIT,
        })
    }

    /// Size in bytes past which the log is moved aside before the next write
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, repo_path: &Path, outcome: &QueryOutcome, elapsed: Duration) -> io::Result<()> {
        self.record_at(Local::now(), repo_path, outcome, elapsed)
    }

    fn record_at(
        &self,
        at: DateTime<Local>,
        repo_path: &Path,
        outcome: &QueryOutcome,
        elapsed: Duration,
    ) -> io::Result<()> {
        let mut file = self.writer()?;
        writeln!(
            file,
            "{} {:>7}ms {:<10} {}",
            at.format("%Y-%m-%d %H:%M:%S"),
            elapsed.as_millis(),
            outcome.to_string(),
            repo_path.display()
        )
    }

    fn writer(&self) -> io::Result<File> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() >= self.limit => {
                let mut old = self.path.clone().into_os_string();
                old.push(".old");
                fs::rename(&self.path, old)?;
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}
