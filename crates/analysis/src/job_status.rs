use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use condor_monitor_core::models::{
    node_status_name, AttributeAccess, JobStatusRow, JobStatusTable, NodeStatusEntry,
    NodeStatusStore,
};
use condor_monitor_core::{MonitorError, MonitorResult, NodeStatusReader};

/// 把工作流的节点状态存储展开为作业状态表
pub struct JobStatusExtractor {
    reader: Arc<dyn NodeStatusReader>,
}

impl JobStatusExtractor {
    pub fn new(reader: Arc<dyn NodeStatusReader>) -> Self {
        Self { reader }
    }

    /// 返回状态表以及原始存储，行顺序与存储一致
    pub fn extract(&self, submit_dir: &Path) -> MonitorResult<(JobStatusTable, NodeStatusStore)> {
        let store = self.reader.read_node_status(submit_dir)?;
        let rows = store
            .iter()
            .map(status_row)
            .collect::<MonitorResult<Vec<_>>>()?;

        info!(
            "提交目录 {} 共 {} 个作业",
            submit_dir.display(),
            rows.len()
        );
        Ok((JobStatusTable::new(submit_dir, rows), store))
    }
}

/// 单个节点状态条目到状态表行的转换
pub fn status_row(entry: &NodeStatusEntry) -> MonitorResult<JobStatusRow> {
    let info = &entry.info;
    let job_id = entry.job_id.as_str();

    let job_label = info
        .str_attr("bps_job_label")
        .ok_or_else(|| MonitorError::malformed(job_id, "bps_job_label"))?
        .to_string();

    let node = info.str_attr("Node").unwrap_or(&job_label).to_string();

    let node_status = match info.get("NodeStatus") {
        Some(Value::String(status)) => status.clone(),
        Some(Value::Number(_)) => info
            .i64_attr("NodeStatus")
            .map(node_status_name)
            .ok_or_else(|| MonitorError::malformed(job_id, "NodeStatus"))?,
        _ => return Err(MonitorError::malformed(job_id, "NodeStatus")),
    };

    let (exit_code, exit_by_signal) = match info.get("ToE") {
        None | Some(Value::Null) => (-1, None),
        Some(_) => {
            let toe = info
                .object_attr("ToE")
                .ok_or_else(|| MonitorError::malformed(job_id, "ToE"))?;
            let code = toe
                .i64_attr("ExitCode")
                .ok_or_else(|| MonitorError::malformed(job_id, "ToE.ExitCode"))?;
            let by_signal = toe
                .bool_attr("ExitBySignal")
                .ok_or_else(|| MonitorError::malformed(job_id, "ToE.ExitBySignal"))?;
            (code, Some(by_signal))
        }
    };

    let node_type = match info.get("wms_node_type") {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Object(node_type)) => node_type
            .str_attr("name")
            .ok_or_else(|| MonitorError::malformed(job_id, "wms_node_type.name"))?
            .to_string(),
        _ => return Err(MonitorError::malformed(job_id, "wms_node_type")),
    };

    let worker_node = match info.str_attr("SlotName") {
        Some(slot) => Some(
            worker_host(slot).ok_or_else(|| MonitorError::malformed(job_id, "SlotName"))?,
        ),
        None => None,
    };

    debug!("作业 {} ({}) 状态: {}", job_id, node, node_status);

    Ok(JobStatusRow {
        job_id: job_id.to_string(),
        node,
        node_status,
        exit_code,
        exit_by_signal,
        node_type,
        worker_node,
        job_label,
    })
}

/// `slot1_3@sdfrome012.sdf.slac.stanford.edu` -> `sdfrome012`
fn worker_host(slot: &str) -> Option<String> {
    let host = slot.split('@').nth(1)?;
    host.split('.').next().map(str::to_string)
}
