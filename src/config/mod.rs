pub mod settings;

pub use settings::{BehaviorConfig, ColorMode, Config, ConfigError, GitConfig, ReportConfig, ScanConfig};
