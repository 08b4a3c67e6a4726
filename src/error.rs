use std::io;
use std::path::PathBuf;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::settings::ConfigError;

/// Errors that can occur while running a status query against a repository
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Git command failed: {0}")]
    CommandFailed(String),

    #[error("git status in {path} timed out after {seconds}s")]
    Timeout { path: PathBuf, seconds: u64 },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Errors that make the root of a scan unusable
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Cannot read directory {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Top-level application error that wraps all module-specific errors
///
/// Only these errors abort a run. Per-repository status failures are
/// reported in the output instead of being raised through here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for status queries
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type for scanning
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
