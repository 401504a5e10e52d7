use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 一个已提交工作流的标识信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowParams {
    pub run_id: i64,
    /// 工作流所在的调度器名称
    pub scheduler: String,
    pub run_label: String,
    pub submit_dir: PathBuf,
}
