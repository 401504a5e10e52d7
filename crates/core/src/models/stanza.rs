use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// 日志片段：从一个标签行开始的连续行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStanza {
    pub source: PathBuf,
    pub lines: Vec<String>,
}

impl LogStanza {
    pub fn new<P: Into<PathBuf>>(source: P, lines: Vec<String>) -> Self {
        Self {
            source: source.into(),
            lines,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }
}
