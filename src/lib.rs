pub mod app;
pub mod config;
pub mod error;
pub mod git;
pub mod history;
pub mod report;
pub mod scan;

// Re-export commonly used types for convenience
pub use app::{StatusReport, collect};
pub use config::Config;
pub use error::{AppError, AppResult, GitError, GitResult, ScanError, ScanResult};
pub use git::{ConditionFlags, GitStatusRunner, Repository, StatusRunner, StatusState, classify};
pub use report::Renderer;
pub use scan::{Scanner, scan};
