//! Test data builders with sensible defaults

use condor_monitor_core::models::{Attributes, JobRecord, NodeStatusEntry, Scheduler};
use serde_json::{json, Value};

/// Schedulers named after the given list, in order
pub fn schedulers(names: &[&str]) -> Vec<Scheduler> {
    names
        .iter()
        .map(|name| Scheduler::new(*name).with_address(format!("<{name}:9618>")))
        .collect()
}

/// Builder for a [`JobRecord`]
#[derive(Debug, Clone, Default)]
pub struct JobRecordBuilder {
    record: JobRecord,
}

impl JobRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a job whose attributes are given as a JSON object
    pub fn job(mut self, job_id: &str, attrs: Value) -> Self {
        let attrs = attrs.as_object().cloned().unwrap_or_default();
        self.record.insert(job_id.to_string(), attrs);
        self
    }

    /// Adds a top-level workflow submission record
    pub fn workflow(self, job_id: &str, run_label: &str, submit_dir: &str) -> Self {
        let cluster = job_id.split('.').next().unwrap_or(job_id).to_string();
        self.job(
            job_id,
            json!({
                "bps_run": run_label,
                "Iwd": submit_dir,
                "ClusterId": cluster,
                "JobBatchId": format!("batch-{cluster}"),
                "JobUniverse": 7,
            }),
        )
    }

    pub fn build(self) -> JobRecord {
        self.record
    }
}

/// Builder for one node-status store entry
#[derive(Debug, Clone)]
pub struct NodeInfoBuilder {
    job_id: String,
    info: Attributes,
}

impl NodeInfoBuilder {
    pub fn new(job_id: &str, job_label: &str) -> Self {
        let mut info = Attributes::new();
        info.insert("bps_job_label".to_string(), json!(job_label));
        info.insert("NodeStatus".to_string(), json!("Done"));
        info.insert("wms_node_type".to_string(), json!({"name": "PAYLOAD"}));
        Self {
            job_id: job_id.to_string(),
            info,
        }
    }

    pub fn node(mut self, node: &str) -> Self {
        self.info.insert("Node".to_string(), json!(node));
        self
    }

    pub fn status(mut self, status: Value) -> Self {
        self.info.insert("NodeStatus".to_string(), status);
        self
    }

    pub fn node_type(mut self, node_type: Value) -> Self {
        self.info.insert("wms_node_type".to_string(), node_type);
        self
    }

    pub fn terminated(mut self, exit_code: i64, by_signal: bool) -> Self {
        self.info.insert(
            "ToE".to_string(),
            json!({"ExitCode": exit_code, "ExitBySignal": by_signal}),
        );
        self
    }

    pub fn slot(mut self, slot_name: &str) -> Self {
        self.info.insert("SlotName".to_string(), json!(slot_name));
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.info.remove(key);
        self
    }

    pub fn build(self) -> NodeStatusEntry {
        NodeStatusEntry {
            job_id: self.job_id,
            info: self.info,
        }
    }
}
