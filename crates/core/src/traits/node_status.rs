use std::path::Path;

use crate::{models::NodeStatusStore, MonitorResult};

/// 读取工作流持久化的节点状态存储
pub trait NodeStatusReader: Send + Sync {
    fn read_node_status(&self, submit_dir: &Path) -> MonitorResult<NodeStatusStore>;
}
