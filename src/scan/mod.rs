pub mod scanner;

pub use scanner::{ScanOutcome, Scanner, SkippedPath, scan};
