use serde::{Deserialize, Serialize};

/// 作业状态与日志分析配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 提交目录下节点状态存储的文件名
    pub node_status_file: String,
    pub finder_default_limit: usize,
    pub retriever_top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            node_status_file: "node_status.json".to_string(),
            finder_default_limit: 10,
            retriever_top_k: 3,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.node_status_file.trim().is_empty() {
            return Err(anyhow::anyhow!("节点状态文件名不能为空"));
        }

        if self.finder_default_limit == 0 {
            return Err(anyhow::anyhow!("日志文件默认数量上限必须大于0"));
        }

        if self.retriever_top_k == 0 {
            return Err(anyhow::anyhow!("检索返回片段数必须大于0"));
        }

        Ok(())
    }
}
