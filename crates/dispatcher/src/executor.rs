use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use condor_monitor_core::config::MAX_HISTORY_DAYS;
use condor_monitor_core::models::augment_job_record;
use condor_monitor_core::{
    MonitorError, MonitorResult, QueryBackend, QueryRequest, Scheduler, SchedulerResults,
};

/// 一次搜索在所有worker之间共享的参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub constraint: String,
    /// 追加历史查询的时间窗口（天），`None` 表示只查当前队列
    pub history_days: Option<f64>,
    pub projection: Option<Vec<String>>,
    pub options: BTreeMap<String, String>,
}

impl SearchParams {
    pub fn new<S: Into<String>>(constraint: S) -> Self {
        Self {
            constraint: constraint.into(),
            ..Self::default()
        }
    }

    pub fn with_history(mut self, days: Option<f64>) -> Self {
        self.history_days = days;
        self
    }

    pub fn with_projection(mut self, projection: Vec<String>) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_option<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    fn live_request(&self) -> QueryRequest {
        QueryRequest::new(self.constraint.clone())
            .with_projection(self.projection.clone())
            .with_options(self.options.clone())
    }
}

/// 历史窗口起点的Unix时间戳（秒）
///
/// 窗口为负、非有限值或超出时间范围时返回配置错误。
pub fn history_epoch(now: DateTime<Utc>, days: f64) -> MonitorResult<i64> {
    let invalid = || MonitorError::config_error(format!("历史查询天数无效: {days}"));
    if !days.is_finite() || !(0.0..=MAX_HISTORY_DAYS).contains(&days) {
        return Err(invalid());
    }
    let window =
        Duration::try_milliseconds((days * 86_400_000.0).round() as i64).ok_or_else(invalid)?;
    now.checked_sub_signed(window)
        .map(|start| start.timestamp())
        .ok_or_else(invalid)
}

/// 在实时约束后追加完成时间窗口子句
pub fn history_constraint(constraint: &str, epoch: i64) -> String {
    let window = format!("(CompletionDate >= {epoch} || JobFinishedHookDone >= {epoch})");
    if constraint.trim().is_empty() {
        window
    } else {
        format!("{constraint} && {window}")
    }
}

/// 针对一组调度器执行单次（可含历史）查询
///
/// 没有缓存，后端错误原样向上传播。
pub struct QueryExecutor {
    backend: Arc<dyn QueryBackend>,
}

impl QueryExecutor {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self { backend }
    }

    pub async fn query(
        &self,
        params: &SearchParams,
        targets: &[Scheduler],
    ) -> MonitorResult<SchedulerResults> {
        self.query_at(params, targets, Utc::now()).await
    }

    /// 以给定的当前时间执行查询，历史窗口据此计算
    pub async fn query_at(
        &self,
        params: &SearchParams,
        targets: &[Scheduler],
        now: DateTime<Utc>,
    ) -> MonitorResult<SchedulerResults> {
        let live_request = params.live_request();
        let history_request = match params.history_days {
            Some(days) => {
                let epoch = history_epoch(now, days)?;
                Some(QueryRequest {
                    constraint: history_constraint(&params.constraint, epoch),
                    ..live_request.clone()
                })
            }
            None => None,
        };

        let mut results = SchedulerResults::new();
        for scheduler in targets {
            let mut record = self.backend.query(scheduler, &live_request).await?;
            debug!("调度器 {} 当前队列返回 {} 个作业", scheduler.name, record.len());

            if let Some(request) = &history_request {
                let history = self.backend.history(scheduler, request).await?;
                debug!("调度器 {} 历史记录返回 {} 个作业", scheduler.name, history.len());
                augment_job_record(&mut record, history);
            }

            results.insert(scheduler.name.clone(), record);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_history_epoch() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(history_epoch(now, 1.0).unwrap(), now.timestamp() - 86_400);
        assert_eq!(history_epoch(now, 0.5).unwrap(), now.timestamp() - 43_200);
        assert_eq!(history_epoch(now, 0.0).unwrap(), now.timestamp());
    }

    #[test]
    fn test_history_epoch_out_of_range() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        for days in [1.0e8, 1.0e300, f64::INFINITY, f64::NAN, -0.5] {
            assert!(
                matches!(history_epoch(now, days), Err(MonitorError::Configuration(_))),
                "window should be rejected: {days}"
            );
        }
    }

    #[test]
    fn test_history_constraint() {
        assert_eq!(
            history_constraint(r#"Owner=="jdoe""#, 1700000000),
            r#"Owner=="jdoe" && (CompletionDate >= 1700000000 || JobFinishedHookDone >= 1700000000)"#
        );
        assert_eq!(
            history_constraint("", 5),
            "(CompletionDate >= 5 || JobFinishedHookDone >= 5)"
        );
    }
}
