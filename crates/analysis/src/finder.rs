use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use condor_monitor_core::models::{coerce_job_id, JobStatusRow, JobStatusTable};
use condor_monitor_core::{MonitorError, MonitorResult};

use crate::predicate::Predicate;

pub const DEFAULT_LIMIT: usize = 10;

/// 根据过滤表达式在作业状态表中选出作业，并定位其 `.out` 日志文件
///
/// 日志目录结构为 `<submit_dir>/jobs/<job_label>/<components>/`，
/// components 取节点名中最后一次出现的 job_label 之后的部分，
/// 去掉开头的 `_` 后按 `_` 切分。
#[derive(Debug, Clone)]
pub struct LogFileFinder {
    table: JobStatusTable,
    default_limit: usize,
}

impl LogFileFinder {
    pub fn new(table: JobStatusTable) -> Self {
        Self {
            table,
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn table(&self) -> &JobStatusTable {
        &self.table
    }

    pub fn submit_dir(&self) -> &Path {
        self.table.submit_dir()
    }

    /// 按表格顺序返回前 `limit` 个匹配作业的日志文件
    pub fn find(&self, query: &str, limit: Option<usize>) -> MonitorResult<Vec<PathBuf>> {
        let predicate = Predicate::parse(query)?;
        let limit = limit.unwrap_or(self.default_limit);

        let files = self
            .table
            .iter()
            .filter(|row| predicate.matches(row))
            .take(limit)
            .map(|row| self.locate(row))
            .collect::<MonitorResult<Vec<_>>>()?;

        info!("查询 `{}` 找到 {} 个日志文件", query, files.len());
        Ok(files)
    }

    pub fn log_dir(&self, row: &JobStatusRow) -> PathBuf {
        let mut dir = self.submit_dir().join("jobs").join(&row.job_label);
        for component in node_components(&row.node, &row.job_label) {
            dir.push(component);
        }
        dir
    }

    /// 日志目录中文件名包含作业ID且以 `.out` 结尾的唯一文件
    pub fn locate(&self, row: &JobStatusRow) -> MonitorResult<PathBuf> {
        let dir = self.log_dir(row);
        if !dir.is_dir() {
            return Err(MonitorError::LogDirectoryMissing {
                path: dir.display().to_string(),
            });
        }

        let job_id = coerce_job_id(&row.job_id)
            .ok_or_else(|| MonitorError::malformed(&row.job_id, "job_id"))?
            .to_string();

        let mut matches = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| MonitorError::io(&dir, e))? {
            let entry = entry.map_err(|e| MonitorError::io(&dir, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.ends_with(".out") && name.contains(&job_id) {
                matches.push(entry.path());
            }
        }

        match matches.len() {
            1 => {
                let file = matches.remove(0);
                debug!("作业 {} 的日志文件: {}", row.job_id, file.display());
                Ok(file)
            }
            n => Err(MonitorError::LookupMismatch {
                job_id: row.job_id.clone(),
                dir: dir.display().to_string(),
                matches: n,
            }),
        }
    }
}

/// `isr_903342_10` 与标签 `isr` -> `["903342", "10"]`
fn node_components<'a>(node: &'a str, job_label: &str) -> Vec<&'a str> {
    let tail = match node.rfind(job_label) {
        Some(pos) if !job_label.is_empty() => &node[pos + job_label.len()..],
        _ => node,
    };
    tail.trim_start_matches('_')
        .split('_')
        .filter(|component| !component.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_components() {
        assert_eq!(node_components("isr_903342_10", "isr"), vec!["903342", "10"]);
        assert_eq!(
            node_components("wf_isr_isr_903342_10", "isr"),
            vec!["903342", "10"]
        );
        assert_eq!(node_components("finalJob", "finalJob"), Vec::<&str>::new());
        assert_eq!(node_components("pipetaskInit", "other"), vec!["pipetaskInit"]);
        assert_eq!(node_components("a__b", ""), vec!["a", "b"]);
    }
}
