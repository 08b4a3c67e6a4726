use crate::error::GitResult;
use crate::git::classifier::{self, ConditionFlags};
use crate::git::executor::StatusRunner;
use std::path::{Path, PathBuf};

/// Where a repository is in its query lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusState {
    /// Discovered but not queried yet; flags are unset
    Pending,
    /// Status text was captured and classified
    Known(ConditionFlags),
    /// The status query failed; holds the reason
    Unknown(String),
}

/// A repository found by the scanner
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    state: StatusState,
}

impl Repository {
    /// Create a handle for a known repository root
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: StatusState::Pending,
        }
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last segment of the repository path
    pub fn name(&self) -> String {
        match self.path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.path.display().to_string(),
        }
    }

    pub fn state(&self) -> &StatusState {
        &self.state
    }

    /// Classified flags, available only after a successful query
    pub fn flags(&self) -> Option<&ConditionFlags> {
        match &self.state {
            StatusState::Known(flags) => Some(flags),
            _ => None,
        }
    }

    /// `None` until the repository has been queried successfully
    pub fn is_clean(&self) -> Option<bool> {
        self.flags().map(|flags| flags.clean)
    }

    pub fn is_dirty(&self) -> Option<bool> {
        self.flags().map(ConditionFlags::is_dirty)
    }

    /// Run a status query through `runner` and classify the result
    ///
    /// On failure the repository is marked [`StatusState::Unknown`] and the
    /// error is handed back so the caller can decide what to do with it.
    pub async fn query_status(&mut self, runner: &dyn StatusRunner) -> GitResult<ConditionFlags> {
        match runner.run_status(&self.path).await {
            Ok(output) => {
                let flags = classifier::classify(&output);
                self.state = StatusState::Known(flags);
                Ok(flags)
            }
            Err(e) => {
                self.mark_unknown(&e.to_string());
                Err(e)
            }
        }
    }

    pub(crate) fn mark_unknown(&mut self, reason: &str) {
        self.state = StatusState::Unknown(reason.to_string());
    }
}
