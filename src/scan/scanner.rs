//! Discovery of repository roots beneath a directory.
//!
//! A directory is a repository root when it directly contains the marker
//! directory (`.git` by default). The walk streams entries from `walkdir`,
//! so large trees are never held in memory at once.

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::git::Repository;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Everything a scan produced
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// The absolute, normalized root that was walked
    pub root: PathBuf,
    /// Repository roots in traversal order, none of them queried yet
    pub repositories: Vec<Repository>,
    /// Branches of the tree that could not be read
    pub skipped: Vec<SkippedPath>,
}

/// A part of the tree the walk had to skip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: String,
}

/// Walks a directory tree looking for repository roots
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan the tree under `root`
    ///
    /// Fails only when the root itself is missing, not a directory or not
    /// listable. Unreadable subdirectories are skipped and reported in
    /// [`ScanOutcome::skipped`].
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> ScanResult<ScanOutcome> {
        let root = resolve_root(root.as_ref())?;
        let mut outcome = ScanOutcome {
            root: root.clone(),
            ..ScanOutcome::default()
        };

        let mut walker = WalkDir::new(&root).follow_links(false).sort_by_file_name();
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let entries = walker
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        for entry in entries {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_dir() && self.is_repository_root(entry.path()) {
                        debug!(path = %entry.path().display(), "found repository");
                        outcome.repositories.push(Repository::new(entry.path()));
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.clone());
                    warn!(path = %path.display(), "skipping unreadable path: {}", err);
                    outcome.skipped.push(SkippedPath {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// Check whether `dir` directly contains the marker directory
    pub fn is_repository_root(&self, dir: &Path) -> bool {
        dir.join(&self.config.marker).is_dir()
    }

    // The root is never pruned, even if it happens to carry the marker name
    fn is_pruned(&self, entry: &DirEntry) -> bool {
        self.config.prune_marker
            && entry.depth() > 0
            && entry.file_type().is_dir()
            && entry.file_name() == self.config.marker.as_str()
    }
}

/// Scan `root` with the default configuration and return the repositories
pub fn scan<P: AsRef<Path>>(root: P) -> ScanResult<Vec<Repository>> {
    Scanner::default()
        .scan(root)
        .map(|outcome| outcome.repositories)
}

/// Make `root` absolute and check that it is a listable directory
fn resolve_root(root: &Path) -> ScanResult<PathBuf> {
    let absolute = std::path::absolute(root).map_err(|source| ScanError::Unreadable {
        path: root.to_path_buf(),
        source,
    })?;
    let absolute = normalize(&absolute);

    let metadata = fs::metadata(&absolute).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ScanError::NotFound(absolute.clone()),
        _ => ScanError::Unreadable {
            path: absolute.clone(),
            source,
        },
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(absolute));
    }

    fs::read_dir(&absolute).map_err(|source| ScanError::Unreadable {
        path: absolute.clone(),
        source,
    })?;

    Ok(absolute)
}

/// Lexically drop `.` and fold `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
