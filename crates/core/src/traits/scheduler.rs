use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{
    models::{JobRecord, Scheduler},
    MonitorResult,
};

/// 单次查询请求
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    /// 调度器原生语法的约束表达式，本系统只拼接不解析
    pub constraint: String,
    /// 需要返回的属性列表，`None` 表示全部
    pub projection: Option<Vec<String>>,
    /// 透传给后端的额外选项
    pub options: BTreeMap<String, String>,
}

impl QueryRequest {
    pub fn new<S: Into<String>>(constraint: S) -> Self {
        Self {
            constraint: constraint.into(),
            ..Self::default()
        }
    }

    pub fn with_projection(mut self, projection: Option<Vec<String>>) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_options(mut self, options: BTreeMap<String, String>) -> Self {
        self.options = options;
        self
    }
}

/// 队列管理器查询接口
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// 查询当前队列中的作业
    async fn query(&self, scheduler: &Scheduler, request: &QueryRequest)
        -> MonitorResult<JobRecord>;

    /// 查询历史作业
    async fn history(
        &self,
        scheduler: &Scheduler,
        request: &QueryRequest,
    ) -> MonitorResult<JobRecord>;
}

/// 调度器发现接口
#[async_trait]
pub trait SchedulerLocator: Send + Sync {
    async fn locate_all(&self) -> MonitorResult<Vec<Scheduler>>;
}
