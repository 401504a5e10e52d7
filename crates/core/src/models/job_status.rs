use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::attributes::Attributes;

/// 作业状态表中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusRow {
    pub job_id: String,
    pub node: String,
    pub node_status: String,
    /// 未结束或结果未知时为 -1
    pub exit_code: i64,
    pub exit_by_signal: Option<bool>,
    pub node_type: String,
    pub worker_node: Option<String>,
    pub job_label: String,
}

impl JobStatusRow {
    pub fn has_terminated(&self) -> bool {
        self.exit_by_signal.is_some()
    }
}

/// 一个工作流的作业状态表，附带其提交目录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusTable {
    rows: Vec<JobStatusRow>,
    submit_dir: PathBuf,
}

impl JobStatusTable {
    pub fn new<P: Into<PathBuf>>(submit_dir: P, rows: Vec<JobStatusRow>) -> Self {
        Self {
            rows,
            submit_dir: submit_dir.into(),
        }
    }

    pub fn rows(&self) -> &[JobStatusRow] {
        &self.rows
    }

    pub fn submit_dir(&self) -> &Path {
        &self.submit_dir
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobStatusRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 按作业ID查找（重跑时可能有多行，返回第一行）
    pub fn find(&self, job_id: &str) -> Option<&JobStatusRow> {
        self.rows.iter().find(|row| row.job_id == job_id)
    }
}

/// 节点状态存储中的一个条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStatusEntry {
    pub job_id: String,
    pub info: Attributes,
}

/// 节点状态存储，按存储自身的迭代顺序排列
pub type NodeStatusStore = Vec<NodeStatusEntry>;

/// DAGMan节点状态码对应的名称
pub fn node_status_name(code: i64) -> String {
    let name = match code {
        0 => "NotReady",
        1 => "Ready",
        2 => "PreRun",
        3 => "Submitted",
        4 => "PostRun",
        5 => "Done",
        6 => "Error",
        7 => "Futile",
        other => return format!("Unknown({other})"),
    };
    name.to_string()
}
