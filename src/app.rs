use crate::config::Config;
use crate::error::AppResult;
use crate::git::{QueryFailure, Repository, StatusRunner, StatusState, query_all};
use crate::history::QueryLog;
use crate::scan::{Scanner, SkippedPath};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything needed to print a report for one root
#[derive(Debug)]
pub struct StatusReport {
    pub root: PathBuf,
    pub repositories: Vec<Repository>,
    pub skipped: Vec<SkippedPath>,
    pub failures: Vec<QueryFailure>,
}

impl StatusReport {
    /// Repositories with a known, dirty status
    pub fn dirty(&self) -> impl Iterator<Item = &Repository> {
        self.repositories
            .iter()
            .filter(|repo| repo.is_dirty() == Some(true))
    }

    /// True when part of the tree or some repository could not be inspected
    pub fn is_incomplete(&self) -> bool {
        !self.skipped.is_empty() || !self.failures.is_empty()
    }

    /// Trailing notes for stderr: a count line, then one line per skipped
    /// path and per failed query
    pub fn summary(&self) -> Vec<String> {
        let unknown = self
            .repositories
            .iter()
            .filter(|repo| matches!(repo.state(), StatusState::Unknown(_)))
            .count();

        let mut lines = vec![format!(
            "{} repositories, {} dirty, {} unknown, {} paths skipped",
            self.repositories.len(),
            self.dirty().count(),
            unknown,
            self.skipped.len()
        )];
        lines.extend(
            self.skipped
                .iter()
                .map(|skip| format!("  skipped {}: {}", skip.path.display(), skip.reason)),
        );
        lines.extend(
            self.failures
                .iter()
                .map(|failure| format!("  unknown {}: {}", failure.path.display(), failure.error)),
        );
        lines
    }
}

/// Scan `root`, then query every repository found
///
/// Discovery finishes before the first status query starts. Only an unusable
/// root is an error; per-repository failures end up in
/// [`StatusReport::failures`].
pub async fn collect(
    root: &Path,
    config: &Config,
    runner: Arc<dyn StatusRunner>,
) -> AppResult<StatusReport> {
    let outcome = Scanner::new(config.scan.clone()).scan(root)?;
    let mut repositories = outcome.repositories;

    info!(
        root = %outcome.root.display(),
        count = repositories.len(),
        "scan complete"
    );

    let log = if config.behavior.log_queries {
        QueryLog::open_default()
            .map_err(|e| warn!("query log disabled: {}", e))
            .ok()
    } else {
        None
    };

    let failures = query_all(&mut repositories, runner, config.report.jobs, log.as_ref()).await;

    Ok(StatusReport {
        root: outcome.root,
        repositories,
        skipped: outcome.skipped,
        failures,
    })
}
