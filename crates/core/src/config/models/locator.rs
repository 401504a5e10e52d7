use serde::{Deserialize, Serialize};

/// 历史查询窗口的上限（天）
pub const MAX_HISTORY_DAYS: f64 = 36_500.0;

/// 工作流定位配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// 顶层提交作业的universe编号 (7 = scheduler universe，即DAGMan作业)
    pub job_universe: i64,
    pub run_label_attribute: String,
    pub submit_dir_attribute: String,
    /// 同一run_id出现在多个调度器时是否报错，默认后者覆盖前者
    pub reject_duplicates: bool,
    pub default_history_days: Option<f64>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            job_universe: 7,
            run_label_attribute: "bps_run".to_string(),
            submit_dir_attribute: "Iwd".to_string(),
            reject_duplicates: false,
            default_history_days: None,
        }
    }
}

impl LocatorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.run_label_attribute.is_empty() {
            return Err(anyhow::anyhow!("run标签属性名不能为空"));
        }

        if self.submit_dir_attribute.is_empty() {
            return Err(anyhow::anyhow!("提交目录属性名不能为空"));
        }

        if let Some(days) = self.default_history_days {
            if !days.is_finite() || !(0.0..=MAX_HISTORY_DAYS).contains(&days) {
                return Err(anyhow::anyhow!("历史查询天数无效: {days}"));
            }
        }

        Ok(())
    }
}
