use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use condor_monitor_core::models::{NodeStatusEntry, NodeStatusStore};
use condor_monitor_core::{MonitorError, MonitorResult, NodeStatusReader};

/// 读取 `<submit_dir>/<file_name>` 中的节点状态存储
///
/// 文件内容是以作业ID为键的JSON对象，条目按文档顺序返回。
#[derive(Debug, Clone)]
pub struct JsonNodeStatusReader {
    file_name: String,
}

impl JsonNodeStatusReader {
    pub fn new<S: Into<String>>(file_name: S) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn store_path(&self, submit_dir: &Path) -> PathBuf {
        submit_dir.join(&self.file_name)
    }
}

impl NodeStatusReader for JsonNodeStatusReader {
    fn read_node_status(&self, submit_dir: &Path) -> MonitorResult<NodeStatusStore> {
        let path = self.store_path(submit_dir);
        let unavailable = |message: String| MonitorError::NodeStatusUnavailable {
            path: path.display().to_string(),
            message,
        };

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => unavailable("文件不存在".to_string()),
            _ => unavailable(e.to_string()),
        })?;

        let document = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => document,
            Ok(_) => return Err(unavailable("顶层不是JSON对象".to_string())),
            Err(e) => return Err(unavailable(format!("JSON解析失败: {e}"))),
        };

        let store = document
            .into_iter()
            .map(|(job_id, info)| match info {
                Value::Object(info) => Ok(NodeStatusEntry { job_id, info }),
                _ => Err(MonitorError::malformed(job_id, "node status entry")),
            })
            .collect::<MonitorResult<NodeStatusStore>>()?;

        debug!("从 {} 读取到 {} 个节点", path.display(), store.len());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_entries_in_document_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("node_status.json"),
            r#"{
                "9.0": {"bps_job_label": "isr", "NodeStatus": 5},
                "3.0": {"bps_job_label": "calibrate", "NodeStatus": 6},
                "12.0": {"bps_job_label": "finalJob", "NodeStatus": 1}
            }"#,
        )
        .unwrap();

        let store = JsonNodeStatusReader::new("node_status.json")
            .read_node_status(dir.path())
            .unwrap();

        let ids: Vec<&str> = store.iter().map(|e| e.job_id.as_str()).collect();
        assert_eq!(ids, vec!["9.0", "3.0", "12.0"]);
        assert_eq!(store[1].info["bps_job_label"], "calibrate");
    }

    #[test]
    fn test_missing_store_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = JsonNodeStatusReader::new("node_status.json")
            .read_node_status(dir.path())
            .unwrap_err();
        assert!(matches!(err, MonitorError::NodeStatusUnavailable { .. }));
    }

    #[test]
    fn test_invalid_documents() {
        let dir = TempDir::new().unwrap();
        let reader = JsonNodeStatusReader::new("status.json");

        fs::write(dir.path().join("status.json"), "[1, 2]").unwrap();
        assert!(matches!(
            reader.read_node_status(dir.path()),
            Err(MonitorError::NodeStatusUnavailable { .. })
        ));

        fs::write(dir.path().join("status.json"), r#"{"1.0": 5}"#).unwrap();
        assert!(matches!(
            reader.read_node_status(dir.path()),
            Err(MonitorError::MalformedRecord { ref job_id, .. }) if job_id == "1.0"
        ));
    }
}
