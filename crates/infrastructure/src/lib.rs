//! 外部协作方的具体实现
//!
//! - [`CondorCli`]: 通过 `condor_status` / `condor_q` / `condor_history`
//!   命令行工具实现调度器发现与作业查询
//! - [`JsonNodeStatusReader`]: 读取提交目录下的JSON节点状态存储

pub mod condor_cli;
pub mod node_status;

pub use condor_cli::{parse_classads, parse_schedulers, CondorCli};
pub use node_status::JsonNodeStatusReader;
