use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};

use condor_monitor_core::config::DispatcherConfig;
use condor_monitor_core::{MonitorError, MonitorResult, Scheduler, SchedulerResults};

use crate::executor::{QueryExecutor, SearchParams};
use crate::registry::SchedulerRegistry;

/// 单次分发的目标与并发度
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// 只查询这些调度器，`None` 表示注册表中的全部
    pub schedulers: Option<Vec<String>>,
    /// worker数，`None` 表示每个调度器一个（受配置上限约束）
    pub workers: Option<usize>,
}

impl DispatchOptions {
    pub fn with_schedulers(mut self, schedulers: Vec<String>) -> Self {
        self.schedulers = Some(schedulers);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }
}

/// 把同一查询并行分发到多个调度器并合并结果
///
/// 每个调度器一个独立任务，信号量限制同时在途的查询数。
/// 任一worker失败即中止其余worker、等待其退出后返回该错误，
/// 不会返回部分结果。合并顺序为注册顺序，重名时后者覆盖前者。
pub struct ParallelQueryDispatcher {
    registry: Arc<SchedulerRegistry>,
    executor: Arc<QueryExecutor>,
    max_workers: Option<usize>,
    worker_timeout: Option<Duration>,
}

impl ParallelQueryDispatcher {
    pub fn new(
        registry: Arc<SchedulerRegistry>,
        executor: Arc<QueryExecutor>,
        config: &DispatcherConfig,
    ) -> Self {
        Self {
            registry,
            executor,
            max_workers: config.max_workers,
            worker_timeout: config.worker_timeout_seconds.map(Duration::from_secs),
        }
    }

    pub fn with_worker_timeout(mut self, timeout: Duration) -> Self {
        self.worker_timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> &Arc<SchedulerRegistry> {
        &self.registry
    }

    fn resolve_workers(&self, requested: Option<usize>, targets: usize) -> MonitorResult<usize> {
        let workers = match requested {
            Some(workers) => workers,
            None => match self.max_workers {
                Some(cap) => targets.min(cap),
                None => targets,
            },
        };
        if workers == 0 {
            return Err(MonitorError::config_error("worker数必须大于0"));
        }
        Ok(workers)
    }

    pub async fn dispatch(
        &self,
        params: &SearchParams,
        options: &DispatchOptions,
    ) -> MonitorResult<SchedulerResults> {
        let targets = match &options.schedulers {
            Some(names) => self.registry.select(names)?,
            None => self.registry.schedulers().to_vec(),
        };
        if targets.is_empty() {
            warn!("没有可查询的调度器，返回空结果");
            return Ok(SchedulerResults::new());
        }

        let workers = self.resolve_workers(options.workers, targets.len())?;
        let start_time = Instant::now();

        let results = if workers == 1 {
            debug!("单worker模式，在当前任务中顺序查询 {} 个调度器", targets.len());
            self.dispatch_inline(params, &targets).await?
        } else {
            self.dispatch_parallel(params, targets, workers).await?
        };

        info!(
            "查询完成: {} 个调度器，{} 个作业，耗时 {}ms",
            results.len(),
            results.job_count(),
            start_time.elapsed().as_millis()
        );
        Ok(results)
    }

    async fn dispatch_inline(
        &self,
        params: &SearchParams,
        targets: &[Scheduler],
    ) -> MonitorResult<SchedulerResults> {
        let query = self.executor.query(params, targets);
        match self.worker_timeout {
            Some(limit) => tokio::time::timeout(limit, query).await.map_err(|_| {
                MonitorError::WorkerTimeout {
                    scheduler: join_names(targets),
                    millis: limit.as_millis(),
                }
            })?,
            None => query.await,
        }
    }

    async fn dispatch_parallel(
        &self,
        params: &SearchParams,
        targets: Vec<Scheduler>,
        workers: usize,
    ) -> MonitorResult<SchedulerResults> {
        debug!("启动 {} 个worker查询 {} 个调度器", workers, targets.len());

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut join_set = JoinSet::new();
        let mut task_names = HashMap::new();
        let target_count = targets.len();

        for (index, scheduler) in targets.into_iter().enumerate() {
            let name = scheduler.name.clone();
            let span = info_span!("scheduler_query", scheduler = %name);
            let semaphore = Arc::clone(&semaphore);
            let executor = Arc::clone(&self.executor);
            let params = params.clone();
            let timeout = self.worker_timeout;

            let handle = join_set.spawn(
                async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| MonitorError::Internal(format!("worker信号量已关闭: {e}")))?;
                    let results = run_worker(&executor, &params, scheduler, timeout).await?;
                    Ok::<_, MonitorError>((index, results))
                }
                .instrument(span),
            );
            task_names.insert(handle.id(), name);
        }

        let mut slots: Vec<Option<SchedulerResults>> = vec![None; target_count];
        while let Some(joined) = join_set.join_next_with_id().await {
            let failure = match joined {
                Ok((_, Ok((index, results)))) => {
                    slots[index] = Some(results);
                    continue;
                }
                Ok((_, Err(err))) => err,
                Err(join_err) => MonitorError::WorkerFailed {
                    scheduler: task_names
                        .get(&join_err.id())
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: join_err.to_string(),
                },
            };

            error!("调度器查询失败，中止其余worker: {failure}");
            join_set.shutdown().await;
            return Err(failure);
        }

        let mut merged = SchedulerResults::new();
        for results in slots.into_iter().flatten() {
            merged.merge(results);
        }
        Ok(merged)
    }
}

async fn run_worker(
    executor: &QueryExecutor,
    params: &SearchParams,
    scheduler: Scheduler,
    timeout: Option<Duration>,
) -> MonitorResult<SchedulerResults> {
    let targets = std::slice::from_ref(&scheduler);
    let query = executor.query(params, targets);
    match timeout {
        Some(limit) => tokio::time::timeout(limit, query).await.map_err(|_| {
            MonitorError::WorkerTimeout {
                scheduler: scheduler.name.clone(),
                millis: limit.as_millis(),
            }
        })?,
        None => query.await,
    }
}

fn join_names(targets: &[Scheduler]) -> String {
    targets
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
