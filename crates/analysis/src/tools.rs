//! 面向智能体的工具调用层
//!
//! 每个工具有一个JSON定义（name / description / inputSchema），
//! 调用时传入JSON参数并返回JSON结果。

use std::path::PathBuf;

use serde_json::{json, Value};
use tracing::debug;

use condor_monitor_core::{MonitorError, MonitorResult};

use crate::finder::LogFileFinder;
use crate::retriever::LogRetriever;
use crate::summary::LogSummaryExtractor;

pub const FIND_LOG_FILES: &str = "find_log_files";
pub const LOG_RETRIEVER: &str = "log_retriever";
pub const LOAD_LOG_SUMMARY: &str = "load_log_summary";

/// 可分发的全部工具名
pub fn tool_names() -> &'static [&'static str] {
    &[FIND_LOG_FILES, LOG_RETRIEVER, LOAD_LOG_SUMMARY]
}

/// 工具集合。日志查找和检索依赖具体工作流，未配置时不对外提供。
#[derive(Default)]
pub struct AgentTools {
    finder: Option<LogFileFinder>,
    retriever: Option<LogRetriever>,
    summarizer: LogSummaryExtractor,
}

impl AgentTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_finder(mut self, finder: LogFileFinder) -> Self {
        self.finder = Some(finder);
        self
    }

    pub fn with_retriever(mut self, retriever: LogRetriever) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn with_summarizer(mut self, summarizer: LogSummaryExtractor) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// 当前可用工具的定义，按名称排序
    pub fn definitions(&self) -> Vec<Value> {
        let mut tools = Vec::new();
        if self.finder.is_some() {
            tools.push(json!({
                "name": FIND_LOG_FILES,
                "description": "Finds log files for queried jobs in a run.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Query string for selecting jobs, e.g. \"ExitCode==1\" to find the failed jobs."
                        },
                        "limit": {
                            "type": ["integer", "null"],
                            "description": "Limit on number of log files."
                        }
                    },
                    "required": ["query"]
                }
            }));
        }
        if self.retriever.is_some() {
            tools.push(json!({
                "name": LOG_RETRIEVER,
                "description": "Searches through log files to find error patterns or events.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "Error string to search for." }
                    },
                    "required": ["query"]
                }
            }));
        }
        tools.push(json!({
            "name": LOAD_LOG_SUMMARY,
            "description": "Reads logs and extracts only the relevant error lines to save context space.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "file_list": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of file paths to read."
                    }
                },
                "required": ["file_list"]
            }
        }));

        tools.sort_by_key(|tool| {
            tool.get("name")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string()
        });
        tools
    }

    pub fn invoke(&self, name: &str, args: &Value) -> MonitorResult<Value> {
        debug!("调用工具 {} 参数: {}", name, args);
        match name {
            FIND_LOG_FILES => {
                let finder = self.finder.as_ref().ok_or_else(|| unavailable(name))?;
                let query = required_str(name, args, "query")?;
                let limit = optional_usize(name, args, "limit")?;
                let files = finder.find(query, limit)?;
                Ok(json!(files
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()))
            }
            LOG_RETRIEVER => {
                let retriever = self.retriever.as_ref().ok_or_else(|| unavailable(name))?;
                let query = required_str(name, args, "query")?;
                Ok(Value::String(retriever.retrieve_text(query)))
            }
            LOAD_LOG_SUMMARY => {
                let files = string_list(name, args, "file_list")?;
                Ok(Value::String(self.summarizer.summarize(&files)?))
            }
            _ => Err(MonitorError::UnknownTool(name.to_string())),
        }
    }
}

fn unavailable(name: &str) -> MonitorError {
    MonitorError::UnknownTool(format!("{name} (当前未配置)"))
}

fn required_str<'a>(tool: &str, args: &'a Value, key: &str) -> MonitorResult<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| MonitorError::invalid_tool_args(tool, format!("缺少字符串参数 `{key}`")))
}

fn optional_usize(tool: &str, args: &Value, key: &str) -> MonitorResult<Option<usize>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                MonitorError::invalid_tool_args(tool, format!("`{key}` 必须是非负整数"))
            }),
    }
}

fn string_list(tool: &str, args: &Value, key: &str) -> MonitorResult<Vec<PathBuf>> {
    let invalid = || MonitorError::invalid_tool_args(tool, format!("`{key}` 必须是字符串数组"));
    args.get(key)
        .and_then(Value::as_array)
        .ok_or_else(invalid)?
        .iter()
        .map(|item| item.as_str().map(PathBuf::from).ok_or_else(invalid))
        .collect()
}
