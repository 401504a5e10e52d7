use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use condor_monitor_core::config::LocatorConfig;
use condor_monitor_core::models::{coerce_job_id, AttributeAccess};
use condor_monitor_core::{MonitorError, MonitorResult, SchedulerResults, WorkflowParams};

use crate::executor::SearchParams;
use crate::parallel::{DispatchOptions, ParallelQueryDispatcher};

/// 查找用户提交的工作流（顶层DAGMan作业）
pub struct WorkflowLocator {
    dispatcher: Arc<ParallelQueryDispatcher>,
    config: LocatorConfig,
}

impl WorkflowLocator {
    pub fn new(dispatcher: Arc<ParallelQueryDispatcher>, config: LocatorConfig) -> Self {
        Self { dispatcher, config }
    }

    /// 选出属于 `user` 的顶层提交作业
    pub fn constraint(&self, user: &str) -> String {
        format!(
            r#"Owner=="{user}" && JobUniverse=={}"#,
            self.config.job_universe
        )
    }

    pub fn projection(&self) -> Vec<String> {
        vec![
            self.config.run_label_attribute.clone(),
            self.config.submit_dir_attribute.clone(),
            "ClusterId".to_string(),
            "JobBatchId".to_string(),
        ]
    }

    pub async fn locate(
        &self,
        user: &str,
        history_days: Option<f64>,
    ) -> MonitorResult<BTreeMap<i64, WorkflowParams>> {
        self.locate_with(user, history_days, &DispatchOptions::default())
            .await
    }

    pub async fn locate_with(
        &self,
        user: &str,
        history_days: Option<f64>,
        options: &DispatchOptions,
    ) -> MonitorResult<BTreeMap<i64, WorkflowParams>> {
        let params = SearchParams::new(self.constraint(user))
            .with_history(history_days)
            .with_projection(self.projection());

        let results = self.dispatcher.dispatch(&params, options).await?;
        let workflows = self.collect_workflows(results)?;
        info!("用户 {} 共找到 {} 个工作流", user, workflows.len());
        Ok(workflows)
    }

    /// 从聚合查询结果中提取工作流
    ///
    /// 没有run标签属性的记录不是顶层提交作业，直接跳过。
    /// 同一run_id重复出现时后者覆盖前者，除非开启了 `reject_duplicates`。
    pub fn collect_workflows(
        &self,
        results: SchedulerResults,
    ) -> MonitorResult<BTreeMap<i64, WorkflowParams>> {
        let mut workflows: BTreeMap<i64, WorkflowParams> = BTreeMap::new();

        for (scheduler, record) in results {
            for (job_id, attrs) in record {
                let run_label = match attrs.get(&self.config.run_label_attribute) {
                    Some(Value::String(label)) => label.clone(),
                    Some(other) => other.to_string(),
                    None => {
                        debug!("作业 {}@{} 没有run标签，跳过", job_id, scheduler);
                        continue;
                    }
                };

                let run_id = coerce_job_id(&job_id)
                    .ok_or_else(|| MonitorError::malformed(&job_id, "job_id"))?;
                let submit_dir = attrs
                    .str_attr(&self.config.submit_dir_attribute)
                    .map(PathBuf::from)
                    .ok_or_else(|| {
                        MonitorError::malformed(&job_id, &self.config.submit_dir_attribute)
                    })?;

                let params = WorkflowParams {
                    run_id,
                    scheduler: scheduler.clone(),
                    run_label,
                    submit_dir,
                };

                if let Some(previous) = workflows.insert(run_id, params) {
                    if previous.scheduler != scheduler {
                        if self.config.reject_duplicates {
                            return Err(MonitorError::DuplicateWorkflow {
                                run_id,
                                first: previous.scheduler,
                                second: scheduler,
                            });
                        }
                        warn!(
                            "工作流 {} 同时出现在 {} 和 {}，以后者为准",
                            run_id, previous.scheduler, scheduler
                        );
                    }
                }
            }
        }

        Ok(workflows)
    }
}
