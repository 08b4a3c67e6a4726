pub mod batch;
pub mod classifier;
pub mod executor;
pub mod repository;

// Re-export commonly used types
pub use batch::{QueryFailure, default_jobs, query_all};
pub use classifier::{ChangeLabel, ConditionFlags, classify};
pub use executor::{GitStatusRunner, StatusRunner};
pub use repository::{Repository, StatusState};
