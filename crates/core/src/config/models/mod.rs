pub mod analysis;
pub mod app_config;
pub mod condor;
pub mod dispatcher;
pub mod locator;
pub mod observability;

// Re-export main types for easier imports
pub use analysis::AnalysisConfig;
pub use app_config::AppConfig;
pub use condor::CondorConfig;
pub use dispatcher::DispatcherConfig;
pub use locator::{LocatorConfig, MAX_HISTORY_DAYS};
pub use observability::ObservabilityConfig;
