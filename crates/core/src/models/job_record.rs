use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::attributes::Attributes;

/// 单个调度器返回的作业记录: 作业ID -> 属性
pub type JobRecord = BTreeMap<String, Attributes>;

/// 用历史查询结果补充实时查询结果
///
/// 两边都存在的作业取属性并集，冲突时保留实时值；
/// 仅出现在历史结果中的作业（已完成并离开队列）直接加入。
pub fn augment_job_record(live: &mut JobRecord, history: JobRecord) {
    for (job_id, hist_attrs) in history {
        let attrs = live.entry(job_id).or_default();
        for (key, value) in hist_attrs {
            attrs.entry(key).or_insert(value);
        }
    }
}

/// 按调度器名称聚合的查询结果，保持插入顺序
///
/// 插入已存在的调度器名称会原地替换其记录（后写入者胜出）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerResults {
    entries: Vec<(String, JobRecord)>,
}

impl SchedulerResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一个调度器的结果，返回被替换的旧记录
    pub fn insert<S: Into<String>>(&mut self, scheduler: S, record: JobRecord) -> Option<JobRecord> {
        let scheduler = scheduler.into();
        if let Some(slot) = self.entries.iter_mut().find(|(name, _)| *name == scheduler) {
            return Some(std::mem::replace(&mut slot.1, record));
        }
        self.entries.push((scheduler, record));
        None
    }

    /// 合并另一份结果，重名时以 `other` 为准
    pub fn merge(&mut self, other: SchedulerResults) {
        for (scheduler, record) in other {
            self.insert(scheduler, record);
        }
    }

    pub fn get(&self, scheduler: &str) -> Option<&JobRecord> {
        self.entries
            .iter()
            .find(|(name, _)| name == scheduler)
            .map(|(_, record)| record)
    }

    pub fn get_mut(&mut self, scheduler: &str) -> Option<&mut JobRecord> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == scheduler)
            .map(|(_, record)| record)
    }

    pub fn scheduler_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JobRecord)> {
        self.entries
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有调度器的作业总数
    pub fn job_count(&self) -> usize {
        self.entries.iter().map(|(_, record)| record.len()).sum()
    }
}

impl IntoIterator for SchedulerResults {
    type Item = (String, JobRecord);
    type IntoIter = std::vec::IntoIter<(String, JobRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, JobRecord)> for SchedulerResults {
    fn from_iter<I: IntoIterator<Item = (String, JobRecord)>>(iter: I) -> Self {
        let mut results = SchedulerResults::new();
        for (scheduler, record) in iter {
            results.insert(scheduler, record);
        }
        results
    }
}

impl Serialize for SchedulerResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (scheduler, record) in &self.entries {
            map.serialize_entry(scheduler, record)?;
        }
        map.end()
    }
}
