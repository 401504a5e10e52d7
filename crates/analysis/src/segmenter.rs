//! 按日志级别标签切分日志
//!
//! 标签行是以 `WARN` / `INFO` / `ERRO` / `VERB` 开头的行（区分大小写）。
//! 每个片段从一个标签行开始，到下一个标签行之前结束，最后一个片段
//! 一直延续到文件末尾。第一个标签之前的内容不属于任何片段。

use std::fs;
use std::path::Path;

use condor_monitor_core::{LogStanza, MonitorError, MonitorResult};

pub const TAG_PREFIXES: [&str; 4] = ["WARN", "INFO", "ERRO", "VERB"];

pub fn is_tag_line(line: &str) -> bool {
    TAG_PREFIXES.iter().any(|tag| line.starts_with(tag))
}

/// 所有标签行的下标
pub fn tag_indices<S: AsRef<str>>(lines: &[S]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_tag_line(line.as_ref()))
        .map(|(index, _)| index)
        .collect()
}

pub fn segment<P: AsRef<Path>, S: AsRef<str>>(source: P, lines: &[S]) -> Vec<LogStanza> {
    let mut boundaries = tag_indices(lines);
    boundaries.push(lines.len());

    boundaries
        .windows(2)
        .map(|pair| {
            let stanza = lines[pair[0]..pair[1]]
                .iter()
                .map(|line| line.as_ref().to_string())
                .collect();
            LogStanza::new(source.as_ref(), stanza)
        })
        .collect()
}

/// 按 `\n` 切分文本，末尾换行会产生一个空的最后一行
pub fn segment_text<P: AsRef<Path>>(source: P, text: &str) -> Vec<LogStanza> {
    let lines: Vec<&str> = text.split('\n').collect();
    segment(source, &lines)
}

pub fn segment_file<P: AsRef<Path>>(path: P) -> MonitorResult<Vec<LogStanza>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| MonitorError::io(path, e))?;
    Ok(segment_text(path, &text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_lines() {
        assert!(is_tag_line("INFO 2024-01-01 isr: starting"));
        assert!(is_tag_line("ERROR lsst.ctrl.mpexec: failed"));
        assert!(is_tag_line("WARNING something"));
        assert!(is_tag_line("VERBOSE detail"));
        assert!(!is_tag_line("info lowercase"));
        assert!(!is_tag_line(" INFO indented"));
        assert!(!is_tag_line("Traceback (most recent call last):"));
        assert!(!is_tag_line(""));
    }

    #[test]
    fn test_segment_example() {
        let lines = ["hello", "INFOxyz", "a", "b", "ERROaa", "c"];

        let stanzas = segment("job.out", &lines);

        assert_eq!(stanzas.len(), 2);
        assert_eq!(stanzas[0].lines, vec!["INFOxyz", "a", "b"]);
        assert_eq!(stanzas[1].lines, vec!["ERROaa", "c"]);
        assert_eq!(stanzas[1].source(), Path::new("job.out"));
    }

    #[test]
    fn test_segment_without_tags() {
        let lines = ["Traceback (most recent call last):", "  File \"x.py\""];
        assert!(segment("job.out", &lines).is_empty());
        assert!(segment::<_, &str>("job.out", &[]).is_empty());
    }

    #[test]
    fn test_segment_text_trailing_newline() {
        let stanzas = segment_text("job.out", "INFO a\nb\nWARN c\n");

        assert_eq!(stanzas.len(), 2);
        assert_eq!(stanzas[0].content(), "INFO a\nb");
        assert_eq!(stanzas[1].lines, vec!["WARN c", ""]);
    }

    #[test]
    fn test_consecutive_tags() {
        let stanzas = segment_text("job.out", "INFO a\nINFO b\nERROR c");
        let firsts: Vec<_> = stanzas.iter().filter_map(|s| s.first_line()).collect();
        assert_eq!(firsts, vec!["INFO a", "INFO b", "ERROR c"]);
        assert!(stanzas.iter().all(|s| s.lines.len() == 1));
    }
}
