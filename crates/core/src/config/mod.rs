//! 配置管理
//!
//! 配置按 内置默认值 -> TOML文件 -> 环境变量 的顺序叠加，
//! 每个配置段自带 `validate()`，加载完成后统一校验。
//!
//! ```rust,no_run
//! use condor_monitor_core::config::AppConfig;
//!
//! let config = AppConfig::load(Some("config/condor-monitor.toml"))?;
//! println!("worker上限: {:?}", config.dispatcher.max_workers);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod models;

pub use models::{
    AnalysisConfig, AppConfig, CondorConfig, DispatcherConfig, LocatorConfig,
    ObservabilityConfig, MAX_HISTORY_DAYS,
};

#[cfg(test)]
mod tests;
