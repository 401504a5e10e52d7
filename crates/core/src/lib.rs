//! 监控系统的共享基础：错误类型、配置、数据模型和外部协作者接口。

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use errors::*;
pub use models::{
    JobRecord, JobStatusRow, JobStatusTable, LogStanza, Scheduler, SchedulerResults,
    WorkflowParams,
};
pub use traits::{NodeStatusReader, QueryBackend, QueryRequest, SchedulerLocator};
