use thiserror::Error;

/// 监控系统错误类型定义
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("调度器 {scheduler} 查询失败: {message}")]
    Upstream { scheduler: String, message: String },

    #[error("节点状态存储不可用: {path} - {message}")]
    NodeStatusUnavailable { path: String, message: String },

    #[error("记录格式错误: 作业 {job_id} 缺少或包含无效字段 {field}")]
    MalformedRecord { job_id: String, field: String },

    #[error("日志目录不存在: {path}")]
    LogDirectoryMissing { path: String },

    #[error("作业 {job_id} 在 {dir} 中匹配到 {matches} 个日志文件，期望恰好1个")]
    LookupMismatch {
        job_id: String,
        dir: String,
        matches: usize,
    },

    #[error("调度器 {scheduler} 的查询在 {millis}ms 后超时")]
    WorkerTimeout { scheduler: String, millis: u128 },

    #[error("调度器 {scheduler} 的查询任务异常退出: {message}")]
    WorkerFailed { scheduler: String, message: String },

    #[error("未知的调度器: {name}")]
    UnknownScheduler { name: String },

    #[error("调度器名称重复: {name}")]
    DuplicateScheduler { name: String },

    #[error("工作流 {run_id} 同时出现在调度器 {first} 和 {second} 中")]
    DuplicateWorkflow {
        run_id: i64,
        first: String,
        second: String,
    },

    #[error("无效的查询表达式: {0}")]
    InvalidQuery(String),

    #[error("未知的工具: {0}")]
    UnknownTool(String),

    #[error("工具 {tool} 参数无效: {message}")]
    InvalidToolArguments { tool: String, message: String },

    #[error("读取 {path} 失败: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("序列化错误: {0}")]
    Serialization(String),

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 统一的Result类型
pub type MonitorResult<T> = Result<T, MonitorError>;

/// 错误分类，对应故障处理策略中的四类故障
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 查询RPC或节点状态存储不可用
    UpstreamUnavailable,
    /// 记录缺少必需字段
    MalformedRecord,
    /// 日志文件查找结果不唯一
    LookupMismatch,
    /// 并行查询中某个worker失败
    PartialAggregate,
    /// 调用方输入或配置错误
    Usage,
    Internal,
}

impl MonitorError {
    pub fn upstream<S: Into<String>, M: Into<String>>(scheduler: S, message: M) -> Self {
        Self::Upstream {
            scheduler: scheduler.into(),
            message: message.into(),
        }
    }
    pub fn malformed<J: Into<String>, F: Into<String>>(job_id: J, field: F) -> Self {
        Self::MalformedRecord {
            job_id: job_id.into(),
            field: field.into(),
        }
    }
    pub fn io<P: AsRef<std::path::Path>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn invalid_query<S: Into<String>>(msg: S) -> Self {
        Self::InvalidQuery(msg.into())
    }
    pub fn invalid_tool_args<T: Into<String>, M: Into<String>>(tool: T, message: M) -> Self {
        Self::InvalidToolArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }
    pub fn category(&self) -> ErrorCategory {
        match self {
            MonitorError::Upstream { .. }
            | MonitorError::NodeStatusUnavailable { .. }
            | MonitorError::Io { .. } => ErrorCategory::UpstreamUnavailable,
            MonitorError::MalformedRecord { .. } | MonitorError::DuplicateWorkflow { .. } => {
                ErrorCategory::MalformedRecord
            }
            MonitorError::LookupMismatch { .. } | MonitorError::LogDirectoryMissing { .. } => {
                ErrorCategory::LookupMismatch
            }
            MonitorError::WorkerTimeout { .. } | MonitorError::WorkerFailed { .. } => {
                ErrorCategory::PartialAggregate
            }
            MonitorError::UnknownScheduler { .. }
            | MonitorError::DuplicateScheduler { .. }
            | MonitorError::InvalidQuery(_)
            | MonitorError::UnknownTool(_)
            | MonitorError::InvalidToolArguments { .. }
            | MonitorError::Configuration(_) => ErrorCategory::Usage,
            MonitorError::Serialization(_) | MonitorError::Internal(_) => ErrorCategory::Internal,
        }
    }
    pub fn user_message(&self) -> &str {
        match self.category() {
            ErrorCategory::UpstreamUnavailable => "上游服务不可用，结果不完整，请丢弃",
            ErrorCategory::MalformedRecord => "作业记录缺少必需字段",
            ErrorCategory::LookupMismatch => "无法唯一定位作业日志文件",
            ErrorCategory::PartialAggregate => "部分调度器查询失败，聚合结果已丢弃",
            ErrorCategory::Usage => "输入或配置有误",
            ErrorCategory::Internal => "系统内部错误",
        }
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        MonitorError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for MonitorError {
    fn from(err: anyhow::Error) -> Self {
        MonitorError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            MonitorError::upstream("schedd01", "connection refused").category(),
            ErrorCategory::UpstreamUnavailable
        );
        assert_eq!(
            MonitorError::malformed("12.0", "bps_job_label").category(),
            ErrorCategory::MalformedRecord
        );
        assert_eq!(
            MonitorError::LookupMismatch {
                job_id: "12".to_string(),
                dir: "/tmp".to_string(),
                matches: 0,
            }
            .category(),
            ErrorCategory::LookupMismatch
        );
        assert_eq!(
            MonitorError::WorkerTimeout {
                scheduler: "schedd01".to_string(),
                millis: 5_000,
            }
            .category(),
            ErrorCategory::PartialAggregate
        );
    }

    #[test]
    fn test_error_display() {
        let err = MonitorError::malformed("42.0", "bps_job_label");
        assert_eq!(
            err.to_string(),
            "记录格式错误: 作业 42.0 缺少或包含无效字段 bps_job_label"
        );
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let err: MonitorError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, MonitorError::Serialization(_)));
    }
}
