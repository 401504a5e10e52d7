use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use condor_monitor::Application;
use condor_monitor_core::{AppConfig, MonitorError};
use condor_monitor_dispatcher::DispatchOptions;

#[derive(Parser, Debug)]
#[command(name = "condor-monitor")]
#[command(version = "0.1.0")]
#[command(about = "HTCondor批处理工作流监控与日志诊断工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径，未指定时搜索默认位置
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别，覆盖配置文件
    #[arg(short = 'l', long, value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: Option<String>,

    /// 日志格式，覆盖配置文件
    #[arg(long, value_parser = ["json", "pretty"])]
    log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 查找用户提交的工作流
    Workflows {
        /// 提交用户
        user: String,
        /// 同时查询最近若干天内结束的工作流
        #[arg(long)]
        history_days: Option<f64>,
        /// 只查询指定的调度器（可重复）
        #[arg(long = "schedd")]
        schedulers: Vec<String>,
        /// 并行worker数
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// 输出工作流的作业状态表
    Status {
        /// 工作流提交目录
        submit_dir: PathBuf,
    },
    /// 按过滤表达式查找作业日志文件
    FindLogs {
        submit_dir: PathBuf,
        /// 例如 "ExitCode == 1"
        query: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// 提取日志文件中的错误片段
    Summarize {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// 在日志片段中检索
    Retrieve {
        query: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// 输出可用工具的定义
    Tools {
        #[arg(long)]
        submit_dir: Option<PathBuf>,
        /// 供检索工具使用的日志文件（可重复）
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
    /// 调用一个工具
    Invoke {
        name: String,
        /// JSON格式的参数
        #[arg(default_value = "{}")]
        args: String,
        #[arg(long)]
        submit_dir: Option<PathBuf>,
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("加载配置失败")?;
    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.observability.log_level);
    let log_format = cli
        .log_format
        .as_deref()
        .unwrap_or(&config.observability.log_format);
    init_logging(log_level, log_format)?;

    let app = Application::new(config);
    if let Err(e) = run(&app, cli.command).await {
        if let Some(err) = e.downcast_ref::<MonitorError>() {
            error!("{}: {}", err.user_message(), err);
        }
        return Err(e);
    }
    Ok(())
}

async fn run(app: &Application, command: Commands) -> Result<()> {
    match command {
        Commands::Workflows {
            user,
            history_days,
            schedulers,
            workers,
        } => {
            let mut options = DispatchOptions::default();
            if !schedulers.is_empty() {
                options = options.with_schedulers(schedulers);
            }
            if let Some(workers) = workers {
                options = options.with_workers(workers);
            }
            let workflows = app.workflows(&user, history_days, &options).await?;
            print_json(&serde_json::to_value(&workflows)?)?;
        }
        Commands::Status { submit_dir } => {
            let table = app.job_status(&submit_dir)?;
            print_json(&serde_json::to_value(table.rows())?)?;
        }
        Commands::FindLogs {
            submit_dir,
            query,
            limit,
        } => {
            let files = app.log_finder(&submit_dir)?.find(&query, limit)?;
            for file in files {
                println!("{}", file.display());
            }
        }
        Commands::Summarize { files } => {
            println!("{}", app.summarizer().summarize(&files)?);
        }
        Commands::Retrieve {
            query,
            files,
            top_k,
        } => {
            let mut retriever = app.log_retriever(&files)?;
            if let Some(k) = top_k {
                retriever = retriever.with_top_k(k);
            }
            println!("{}", retriever.retrieve_text(&query));
        }
        Commands::Tools { submit_dir, files } => {
            let tools = app.agent_tools(submit_dir.as_deref(), &files)?;
            print_json(&Value::Array(tools.definitions()))?;
        }
        Commands::Invoke {
            name,
            args,
            submit_dir,
            files,
        } => {
            let args: Value = serde_json::from_str(&args)
                .with_context(|| format!("工具参数不是有效的JSON: {args}"))?;
            let tools = app.agent_tools(submit_dir.as_deref(), &files)?;
            info!("调用工具 {}", name);
            match tools.invoke(&name, &args)? {
                Value::String(text) => println!("{text}"),
                other => print_json(&other)?,
            }
        }
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 初始化日志系统，输出到stderr以免与命令结果混在一起
fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        "pretty" => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
        _ => {
            return Err(anyhow::anyhow!("不支持的日志格式: {log_format}"));
        }
    }

    Ok(())
}
