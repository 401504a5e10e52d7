use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use condor_monitor_analysis::{
    AgentTools, JobStatusExtractor, KeywordOverlapSearch, LogFileFinder, LogRetriever,
    LogSummaryExtractor,
};
use condor_monitor_core::{
    AppConfig, JobStatusTable, MonitorResult, NodeStatusReader, QueryBackend, SchedulerLocator,
    WorkflowParams,
};
use condor_monitor_dispatcher::{
    DispatchOptions, ParallelQueryDispatcher, QueryExecutor, SchedulerRegistry, WorkflowLocator,
};
use condor_monitor_infrastructure::{CondorCli, JsonNodeStatusReader};

/// 主应用程序，负责按配置组装各组件
///
/// 调度器注册表只在需要查询时才通过发现接口构建。
pub struct Application {
    config: AppConfig,
    scheduler_locator: Arc<dyn SchedulerLocator>,
    backend: Arc<dyn QueryBackend>,
    node_status: Arc<dyn NodeStatusReader>,
}

impl Application {
    /// 使用HTCondor命令行工具和JSON节点状态存储
    pub fn new(config: AppConfig) -> Self {
        let cli = Arc::new(CondorCli::new(config.condor.clone()));
        let reader = Arc::new(JsonNodeStatusReader::new(
            config.analysis.node_status_file.clone(),
        ));
        Self::with_backends(config, cli.clone(), cli, reader)
    }

    pub fn with_backends(
        config: AppConfig,
        scheduler_locator: Arc<dyn SchedulerLocator>,
        backend: Arc<dyn QueryBackend>,
        node_status: Arc<dyn NodeStatusReader>,
    ) -> Self {
        Self {
            config,
            scheduler_locator,
            backend,
            node_status,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 发现调度器并构建工作流定位器
    pub async fn workflow_locator(&self) -> MonitorResult<WorkflowLocator> {
        let registry =
            Arc::new(SchedulerRegistry::discover(self.scheduler_locator.as_ref()).await?);
        let executor = Arc::new(QueryExecutor::new(Arc::clone(&self.backend)));
        let dispatcher = Arc::new(ParallelQueryDispatcher::new(
            registry,
            executor,
            &self.config.dispatcher,
        ));
        Ok(WorkflowLocator::new(dispatcher, self.config.locator.clone()))
    }

    /// `history_days` 为空时使用配置中的默认历史窗口
    pub async fn workflows(
        &self,
        user: &str,
        history_days: Option<f64>,
        options: &DispatchOptions,
    ) -> MonitorResult<BTreeMap<i64, WorkflowParams>> {
        let history_days = history_days.or(self.config.locator.default_history_days);
        info!("查找用户 {} 的工作流，历史窗口: {:?} 天", user, history_days);
        self.workflow_locator()
            .await?
            .locate_with(user, history_days, options)
            .await
    }

    pub fn job_status(&self, submit_dir: &Path) -> MonitorResult<JobStatusTable> {
        let extractor = JobStatusExtractor::new(Arc::clone(&self.node_status));
        let (table, _) = extractor.extract(submit_dir)?;
        Ok(table)
    }

    pub fn log_finder(&self, submit_dir: &Path) -> MonitorResult<LogFileFinder> {
        let table = self.job_status(submit_dir)?;
        Ok(LogFileFinder::new(table)
            .with_default_limit(self.config.analysis.finder_default_limit))
    }

    pub fn log_retriever(&self, files: &[PathBuf]) -> MonitorResult<LogRetriever> {
        let retriever = LogRetriever::from_files(files, Arc::new(KeywordOverlapSearch))?;
        Ok(retriever.with_top_k(self.config.analysis.retriever_top_k))
    }

    pub fn summarizer(&self) -> LogSummaryExtractor {
        LogSummaryExtractor::new()
    }

    /// 按给定的工作流和日志文件组装工具集合
    pub fn agent_tools(
        &self,
        submit_dir: Option<&Path>,
        files: &[PathBuf],
    ) -> MonitorResult<AgentTools> {
        let mut tools = AgentTools::new().with_summarizer(self.summarizer());
        if let Some(dir) = submit_dir {
            tools = tools.with_finder(self.log_finder(dir)?);
        }
        if !files.is_empty() {
            tools = tools.with_retriever(self.log_retriever(files)?);
        }
        Ok(tools)
    }
}
