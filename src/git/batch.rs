use crate::error::GitError;
use crate::git::executor::StatusRunner;
use crate::git::repository::Repository;
use crate::history::{QueryLog, QueryOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// A repository whose status could not be determined
#[derive(Debug)]
pub struct QueryFailure {
    pub path: PathBuf,
    pub error: GitError,
}

/// Query every repository, running at most `jobs` status commands at once
///
/// Results are written back into `repositories` in place, so their order is
/// unchanged. A failed query never aborts the batch: the repository is left
/// in [`StatusState::Unknown`](crate::git::StatusState::Unknown) and the failure is returned.
/// With a `log`, every query's outcome and duration is appended to it.
pub async fn query_all(
    repositories: &mut [Repository],
    runner: Arc<dyn StatusRunner>,
    jobs: usize,
    log: Option<&QueryLog>,
) -> Vec<QueryFailure> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut handles = Vec::with_capacity(repositories.len());

    for repo in repositories.iter() {
        let mut repo = repo.clone();
        let runner = Arc::clone(&runner);
        let semaphore = Arc::clone(&semaphore);

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let started = Instant::now();
            let result = repo.query_status(runner.as_ref()).await;
            let outcome = QueryOutcome::from_result(&result);
            (repo, outcome, started.elapsed(), result.err())
        }));
    }

    let mut failures = Vec::new();
    for (slot, handle) in repositories.iter_mut().zip(handles) {
        match handle.await {
            Ok((repo, outcome, elapsed, error)) => {
                *slot = repo;
                if let Some(log) = log {
                    if let Err(e) = log.record(slot.path(), &outcome, elapsed) {
                        warn!(log = %log.path().display(), "failed to write query log: {}", e);
                    }
                }
                if let Some(error) = error {
                    warn!(path = %slot.path().display(), "status unknown: {}", error);
                    failures.push(QueryFailure {
                        path: slot.path().to_path_buf(),
                        error,
                    });
                } else {
                    debug!(path = %slot.path().display(), state = ?slot.state(), "classified");
                }
            }
            Err(e) => {
                let reason = format!("status task failed: {}", e);
                warn!(path = %slot.path().display(), "{}", reason);
                slot.mark_unknown(&reason);
                failures.push(QueryFailure {
                    path: slot.path().to_path_buf(),
                    error: GitError::CommandFailed(reason),
                });
            }
        }
    }

    failures
}

/// Default concurrency: one status query per available CPU
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitResult;
    use crate::git::repository::StatusState;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Returns canned output per path; paths without an entry fail
    struct MapRunner {
        outputs: HashMap<PathBuf, String>,
    }

    #[async_trait]
    impl StatusRunner for MapRunner {
        async fn run_status(&self, repo_path: &Path) -> GitResult<String> {
            self.outputs
                .get(repo_path)
                .cloned()
                .ok_or_else(|| GitError::CommandFailed(format!("no status for {}", repo_path.display())))
        }
    }

    /// Tracks how many queries run at the same time
    struct CountingRunner {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl StatusRunner for CountingRunner {
        async fn run_status(&self, _repo_path: &Path) -> GitResult<String> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok("working directory clean".to_string())
        }
    }

    #[tokio::test]
    async fn test_query_all_preserves_order_and_classifies() {
        let mut outputs = HashMap::new();
        outputs.insert(PathBuf::from("/r/a"), "working directory clean".to_string());
        outputs.insert(PathBuf::from("/r/b"), "modified: x".to_string());
        outputs.insert(PathBuf::from("/r/c"), "Untracked files:".to_string());
        let runner: Arc<dyn StatusRunner> = Arc::new(MapRunner { outputs });

        let mut repos = vec![
            Repository::new("/r/a"),
            Repository::new("/r/b"),
            Repository::new("/r/c"),
        ];
        let failures = query_all(&mut repos, runner, 2, None).await;

        assert!(failures.is_empty());
        let paths: Vec<_> = repos.iter().map(|r| r.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("/r/a"), PathBuf::from("/r/b"), PathBuf::from("/r/c")]
        );
        assert_eq!(repos[0].is_clean(), Some(true));
        assert!(repos[1].flags().unwrap().has_modified);
        assert!(repos[2].flags().unwrap().has_untracked);
    }

    #[tokio::test]
    async fn test_query_all_skips_failures() {
        let mut outputs = HashMap::new();
        outputs.insert(PathBuf::from("/r/a"), "working directory clean".to_string());
        let runner: Arc<dyn StatusRunner> = Arc::new(MapRunner { outputs });

        let mut repos = vec![Repository::new("/r/a"), Repository::new("/r/broken")];
        let failures = query_all(&mut repos, runner, 4, None).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, PathBuf::from("/r/broken"));
        assert_eq!(repos[0].is_clean(), Some(true));
        assert!(matches!(repos[1].state(), StatusState::Unknown(_)));
    }

    #[tokio::test]
    async fn test_query_all_respects_job_limit() {
        let runner = Arc::new(CountingRunner {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });

        let mut repos: Vec<_> = (0..8)
            .map(|i| Repository::new(format!("/r/{}", i)))
            .collect();
        query_all(&mut repos, runner.clone(), 2, None).await;

        assert!(runner.peak.load(Ordering::SeqCst) <= 2);
        assert!(repos.iter().all(|r| r.is_clean() == Some(true)));
    }

    #[tokio::test]
    async fn test_query_all_zero_jobs_still_runs() {
        let runner = Arc::new(CountingRunner {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });

        let mut repos = vec![Repository::new("/r/a")];
        let failures = query_all(&mut repos, runner.clone(), 0, None).await;

        assert!(failures.is_empty());
        assert_eq!(runner.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_query_all_empty() {
        let runner: Arc<dyn StatusRunner> = Arc::new(MapRunner {
            outputs: HashMap::new(),
        });
        let mut repos: Vec<Repository> = Vec::new();
        assert!(query_all(&mut repos, runner, 1, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_query_all_writes_log_in_order() {
        let mut outputs = HashMap::new();
        outputs.insert(PathBuf::from("/r/a"), "working directory clean".to_string());
        outputs.insert(PathBuf::from("/r/b"), "deleted: x".to_string());
        let runner: Arc<dyn StatusRunner> = Arc::new(MapRunner { outputs });

        let temp = tempfile::TempDir::new().unwrap();
        let log = QueryLog::open(temp.path().join("queries.log")).unwrap();
        let mut repos = vec![
            Repository::new("/r/a"),
            Repository::new("/r/b"),
            Repository::new("/r/c"),
        ];
        query_all(&mut repos, runner, 3, Some(&log)).await;

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("clean") && lines[0].ends_with("/r/a"));
        assert!(lines[1].contains("dirty:deleted") && lines[1].ends_with("/r/b"));
        assert!(lines[2].contains("unknown") && lines[2].ends_with("/r/c"));
    }

    #[test]
    fn test_default_jobs_is_positive() {
        assert!(default_jobs() >= 1);
    }
}
