use std::collections::HashSet;

use condor_monitor_core::{MonitorError, MonitorResult, Scheduler, SchedulerLocator};
use tracing::{debug, info};

/// 进程内可查询的调度器集合
///
/// 在进程启动时构建一次，之后只读，通过 `Arc` 传给需要它的组件。
/// 调度器名称在集合内唯一，迭代顺序即注册顺序。
#[derive(Debug, Clone, Default)]
pub struct SchedulerRegistry {
    schedulers: Vec<Scheduler>,
}

impl SchedulerRegistry {
    pub fn new(schedulers: Vec<Scheduler>) -> MonitorResult<Self> {
        let mut seen = HashSet::new();
        for scheduler in &schedulers {
            if !seen.insert(scheduler.name.as_str()) {
                return Err(MonitorError::DuplicateScheduler {
                    name: scheduler.name.clone(),
                });
            }
        }
        Ok(Self { schedulers })
    }

    /// 通过发现接口构建注册表
    pub async fn discover(locator: &dyn SchedulerLocator) -> MonitorResult<Self> {
        let schedulers = locator.locate_all().await?;
        info!("发现 {} 个调度器", schedulers.len());
        for scheduler in &schedulers {
            debug!(
                "调度器 {} 地址: {}",
                scheduler.name,
                scheduler.address.as_deref().unwrap_or("-")
            );
        }
        Self::new(schedulers)
    }

    pub fn schedulers(&self) -> &[Scheduler] {
        &self.schedulers
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schedulers.iter().map(|s| s.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Scheduler> {
        self.schedulers.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.schedulers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedulers.is_empty()
    }

    /// 选出一个子集，结果保持注册顺序
    pub fn select(&self, names: &[String]) -> MonitorResult<Vec<Scheduler>> {
        if let Some(unknown) = names.iter().find(|name| self.get(name).is_none()) {
            return Err(MonitorError::UnknownScheduler {
                name: unknown.clone(),
            });
        }
        Ok(self
            .schedulers
            .iter()
            .filter(|s| names.contains(&s.name))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> SchedulerRegistry {
        SchedulerRegistry::new(names.iter().map(|n| Scheduler::new(*n)).collect()).unwrap()
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = SchedulerRegistry::new(vec![Scheduler::new("a"), Scheduler::new("a")]);
        assert!(matches!(
            result,
            Err(MonitorError::DuplicateScheduler { name }) if name == "a"
        ));
    }

    #[test]
    fn test_select_keeps_registration_order() {
        let registry = registry(&["sdfiana012", "sdfiana013", "sdfiana014"]);
        let selected = registry
            .select(&["sdfiana014".to_string(), "sdfiana012".to_string()])
            .unwrap();
        let names: Vec<_> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["sdfiana012", "sdfiana014"]);
    }

    #[test]
    fn test_select_unknown_scheduler() {
        let registry = registry(&["a"]);
        let err = registry.select(&["b".to_string()]).unwrap_err();
        assert!(matches!(err, MonitorError::UnknownScheduler { name } if name == "b"));
    }
}
