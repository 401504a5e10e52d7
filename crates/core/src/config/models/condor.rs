use serde::{Deserialize, Serialize};

/// HTCondor命令行工具配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CondorConfig {
    pub condor_q: String,
    pub condor_history: String,
    pub condor_status: String,
    /// collector地址 (`-pool`)，为空时使用本地配置
    pub pool: Option<String>,
    pub command_timeout_seconds: u64,
}

impl Default for CondorConfig {
    fn default() -> Self {
        Self {
            condor_q: "condor_q".to_string(),
            condor_history: "condor_history".to_string(),
            condor_status: "condor_status".to_string(),
            pool: None,
            command_timeout_seconds: 120,
        }
    }
}

impl CondorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("condor_q", &self.condor_q),
            ("condor_history", &self.condor_history),
            ("condor_status", &self.condor_status),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{name} 命令路径不能为空"));
            }
        }

        if self.command_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("命令超时时间必须大于0"));
        }

        Ok(())
    }
}
