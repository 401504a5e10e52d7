use std::fs;
use std::path::Path;

use tracing::debug;

use condor_monitor_core::{MonitorError, MonitorResult};

use crate::segmenter::tag_indices;

/// 没有找到错误片段时取文件末尾的行数
pub const FALLBACK_LINES: usize = 10;

/// 从一组日志文件中提取错误片段，生成压缩后的文本报告
///
/// 与 [`crate::segmenter::segment`] 不同，这里最后一个片段的结束边界是
/// 最后一行的下标，因此文件最后一行不会出现在任何片段里。
#[derive(Debug, Clone)]
pub struct LogSummaryExtractor {
    fallback_lines: usize,
}

impl Default for LogSummaryExtractor {
    fn default() -> Self {
        Self {
            fallback_lines: FALLBACK_LINES,
        }
    }
}

impl LogSummaryExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback_lines(mut self, lines: usize) -> Self {
        self.fallback_lines = lines;
        self
    }

    pub fn summarize<P: AsRef<Path>>(&self, files: &[P]) -> MonitorResult<String> {
        let mut blocks = Vec::with_capacity(files.len());
        for file in files {
            let path = file.as_ref();
            let text = fs::read_to_string(path).map_err(|e| MonitorError::io(path, e))?;
            let lines: Vec<&str> = text.lines().collect();
            blocks.push(self.file_block(path, &lines));
        }
        Ok(blocks.join("\n"))
    }

    /// 单个文件的报告块
    pub fn file_block(&self, path: &Path, lines: &[&str]) -> String {
        let selected = self.select_lines(lines);
        debug!("{} 中选出 {} 行", path.display(), selected.len());
        format!(
            "--- ANALYSIS OF {} ---\n{}\n",
            path.display(),
            selected.join("\n")
        )
    }

    /// 以 `ERROR` 开头的片段中的所有行，没有则取末尾若干行
    pub fn select_lines<'a>(&self, lines: &[&'a str]) -> Vec<&'a str> {
        let mut boundaries = tag_indices(lines);
        boundaries.push(lines.len().saturating_sub(1));

        let mut selected = Vec::new();
        for pair in boundaries.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if start < end && lines[start].starts_with("ERROR") {
                selected.extend_from_slice(&lines[start..end]);
            }
        }

        if selected.is_empty() {
            let tail = lines.len().saturating_sub(self.fallback_lines);
            selected.extend_from_slice(&lines[tail..]);
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_line_excluded_from_error_stanza() {
        let lines = ["INFO start", "x", "y", "ERROR boom", "z"];

        let selected = LogSummaryExtractor::new().select_lines(&lines);

        assert_eq!(selected, vec!["ERROR boom"]);
    }

    #[test]
    fn test_error_stanzas_concatenated() {
        let lines = [
            "ERROR first",
            "  detail 1",
            "INFO ok",
            "ERROR second",
            "  detail 2",
            "INFO done",
            "tail",
        ];

        let selected = LogSummaryExtractor::new().select_lines(&lines);

        assert_eq!(
            selected,
            vec!["ERROR first", "  detail 1", "ERROR second", "  detail 2"]
        );
    }

    #[test]
    fn test_fallback_to_tail() {
        let lines: Vec<String> = (0..15).map(|i| format!("INFO line {i}")).collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();

        let selected = LogSummaryExtractor::new().select_lines(&lines);

        assert_eq!(selected.len(), 10);
        assert_eq!(selected[0], "INFO line 5");
        assert_eq!(selected[9], "INFO line 14");
    }

    #[test]
    fn test_fallback_short_file() {
        let lines = ["plain", "text"];
        assert_eq!(
            LogSummaryExtractor::new().select_lines(&lines),
            vec!["plain", "text"]
        );
        assert!(LogSummaryExtractor::new().select_lines(&[]).is_empty());
    }

    #[test]
    fn test_erro_prefix_is_not_error() {
        let lines = ["ERRO truncated", "more", "end"];
        assert_eq!(
            LogSummaryExtractor::new()
                .with_fallback_lines(1)
                .select_lines(&lines),
            vec!["end"]
        );
    }

    #[test]
    fn test_file_block_format() {
        let block = LogSummaryExtractor::new()
            .file_block(Path::new("/logs/a.out"), &["ERROR x", "y", "INFO z"]);
        assert_eq!(block, "--- ANALYSIS OF /logs/a.out ---\nERROR x\ny\n");
    }
}
