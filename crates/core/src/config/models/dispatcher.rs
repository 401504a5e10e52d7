use serde::{Deserialize, Serialize};

/// 并行查询分发配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// 同时在途查询数的上限，`None` 表示每个调度器一个worker
    pub max_workers: Option<usize>,
    /// 单个调度器查询的超时时间，`None` 表示不限制
    pub worker_timeout_seconds: Option<u64>,
}

impl DispatcherConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_workers == Some(0) {
            return Err(anyhow::anyhow!("最大worker数必须大于0"));
        }

        if self.worker_timeout_seconds == Some(0) {
            return Err(anyhow::anyhow!("worker超时时间必须大于0"));
        }

        Ok(())
    }
}
