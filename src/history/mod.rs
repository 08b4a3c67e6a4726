pub mod query_log;

pub use query_log::{QueryLog, QueryOutcome};
