//! 多调度器查询的分发与聚合
//!
//! - [`SchedulerRegistry`]: 进程内只读的调度器集合
//! - [`QueryExecutor`]: 针对一组调度器的单次查询（可含历史）
//! - [`ParallelQueryDispatcher`]: 每个调度器一个worker的并行分发
//! - [`WorkflowLocator`]: 基于固定约束查找用户的工作流

pub mod executor;
pub mod locator;
pub mod parallel;
pub mod registry;

pub use executor::{history_constraint, history_epoch, QueryExecutor, SearchParams};
pub use locator::WorkflowLocator;
pub use parallel::{DispatchOptions, ParallelQueryDispatcher};
pub use registry::SchedulerRegistry;
