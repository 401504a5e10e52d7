use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, error, info, instrument};

use condor_monitor_core::config::CondorConfig;
use condor_monitor_core::models::{AttributeAccess, Attributes};
use condor_monitor_core::{
    JobRecord, MonitorError, MonitorResult, QueryBackend, QueryRequest, Scheduler,
    SchedulerLocator,
};

/// 构造作业ID所需的属性，投影时总会额外请求
const KEY_ATTRIBUTES: [&str; 2] = ["ClusterId", "ProcId"];

/// 基于HTCondor命令行工具的查询后端
///
/// 每次查询启动一个子进程并以 `-json` 输出解析ClassAd，
/// 超时后子进程随future一起被丢弃并终止。
#[derive(Debug, Clone)]
pub struct CondorCli {
    config: CondorConfig,
}

impl CondorCli {
    pub fn new(config: CondorConfig) -> Self {
        Self { config }
    }

    fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.config.command_timeout_seconds)
    }

    fn push_pool(&self, args: &mut Vec<String>) {
        if let Some(pool) = &self.config.pool {
            args.push("-pool".to_string());
            args.push(pool.clone());
        }
    }

    /// `condor_status` 的调度器发现参数
    pub fn locate_args(&self) -> Vec<String> {
        let mut args = vec!["-schedd".to_string(), "-json".to_string()];
        self.push_pool(&mut args);
        args
    }

    /// `condor_q` / `condor_history` 共用的查询参数
    pub fn query_args(&self, scheduler: &Scheduler, request: &QueryRequest) -> Vec<String> {
        let mut args = vec![
            "-json".to_string(),
            "-name".to_string(),
            scheduler.name.clone(),
        ];
        self.push_pool(&mut args);

        if !request.constraint.trim().is_empty() {
            args.push("-constraint".to_string());
            args.push(request.constraint.clone());
        }

        if let Some(projection) = request.projection.as_ref().filter(|p| !p.is_empty()) {
            let mut attributes = projection.clone();
            for key in KEY_ATTRIBUTES {
                if !attributes.iter().any(|a| a == key) {
                    attributes.push(key.to_string());
                }
            }
            args.push("-attributes".to_string());
            args.push(attributes.join(","));
        }

        for (key, value) in &request.options {
            args.push(format!("-{}", key.trim_start_matches('-')));
            if !value.is_empty() {
                args.push(value.clone());
            }
        }

        args
    }

    #[instrument(skip(self, args))]
    async fn run(&self, program: &str, args: &[String], target: &str) -> MonitorResult<String> {
        let start_time = Instant::now();
        debug!("执行命令: {} {:?}", program, args);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let limit = self.command_timeout();
        let output = match tokio::time::timeout(limit, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(MonitorError::upstream(
                    target,
                    format!("启动 {program} 失败: {e}"),
                ));
            }
            Err(_) => {
                let message = format!("{program} 在 {} 秒后超时", limit.as_secs());
                error!("{}", message);
                return Err(MonitorError::upstream(target, message));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MonitorError::upstream(
                target,
                format!(
                    "{program} 执行失败，退出码: {:?}: {}",
                    output.status.code(),
                    stderr.trim()
                ),
            ));
        }

        debug!(
            "{} 执行完成，耗时 {}ms，输出 {} 字节",
            program,
            start_time.elapsed().as_millis(),
            output.stdout.len()
        );

        String::from_utf8(output.stdout).map_err(|e| {
            MonitorError::upstream(target, format!("{program} 输出不是有效的UTF-8: {e}"))
        })
    }

    async fn query_jobs(
        &self,
        program: &str,
        scheduler: &Scheduler,
        request: &QueryRequest,
    ) -> MonitorResult<JobRecord> {
        let args = self.query_args(scheduler, request);
        let stdout = self.run(program, &args, &scheduler.name).await?;
        parse_classads(&scheduler.name, &stdout)
    }
}

#[async_trait]
impl SchedulerLocator for CondorCli {
    async fn locate_all(&self) -> MonitorResult<Vec<Scheduler>> {
        let target = self.config.pool.as_deref().unwrap_or("local-collector");
        let stdout = self
            .run(&self.config.condor_status, &self.locate_args(), target)
            .await?;
        let schedulers = parse_schedulers(target, &stdout)?;
        info!("collector {} 返回 {} 个调度器", target, schedulers.len());
        Ok(schedulers)
    }
}

#[async_trait]
impl QueryBackend for CondorCli {
    async fn query(
        &self,
        scheduler: &Scheduler,
        request: &QueryRequest,
    ) -> MonitorResult<JobRecord> {
        self.query_jobs(&self.config.condor_q, scheduler, request)
            .await
    }

    async fn history(
        &self,
        scheduler: &Scheduler,
        request: &QueryRequest,
    ) -> MonitorResult<JobRecord> {
        self.query_jobs(&self.config.condor_history, scheduler, request)
            .await
    }
}

fn parse_ad_list(source: &str, stdout: &str) -> MonitorResult<Vec<Attributes>> {
    // 没有匹配的作业时工具不输出任何内容
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(stdout)
        .map_err(|e| MonitorError::upstream(source, format!("无法解析ClassAd JSON: {e}")))?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(ad) => Ok(ad),
                other => Err(MonitorError::upstream(
                    source,
                    format!("ClassAd不是JSON对象: {other}"),
                )),
            })
            .collect(),
        other => Err(MonitorError::upstream(
            source,
            format!("期望ClassAd数组，实际为: {other}"),
        )),
    }
}

/// 把 `condor_q -json` 的输出转换为以 `ClusterId.ProcId` 为键的作业记录
pub fn parse_classads(scheduler: &str, stdout: &str) -> MonitorResult<JobRecord> {
    let mut record = JobRecord::new();
    for (index, ad) in parse_ad_list(scheduler, stdout)?.into_iter().enumerate() {
        let cluster = ad
            .i64_attr("ClusterId")
            .ok_or_else(|| MonitorError::malformed(format!("{scheduler}#{index}"), "ClusterId"))?;
        let proc_id = ad.i64_attr("ProcId").unwrap_or(0);
        record.insert(format!("{cluster}.{proc_id}"), ad);
    }
    Ok(record)
}

/// 把 `condor_status -schedd -json` 的输出转换为调度器列表
pub fn parse_schedulers(collector: &str, stdout: &str) -> MonitorResult<Vec<Scheduler>> {
    parse_ad_list(collector, stdout)?
        .into_iter()
        .enumerate()
        .map(|(index, ad)| {
            let name = ad
                .str_attr("Name")
                .ok_or_else(|| MonitorError::malformed(format!("schedd#{index}"), "Name"))?
                .to_string();
            let address = ad.str_attr("MyAddress").map(str::to_string);
            Ok(Scheduler {
                name,
                address,
                attributes: ad,
            })
        })
        .collect()
}
