use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use condor_monitor_core::{LogStanza, MonitorResult};

use crate::segmenter::segment_file;

pub const DEFAULT_TOP_K: usize = 3;

/// 检索结果之间的分隔符
pub const RESULT_SEPARATOR: &str = "\n---\n";

/// 相似度检索后端
pub trait SimilaritySearch: Send + Sync {
    /// 返回与 `query` 最相关的至多 `k` 个片段的下标，按相关度从高到低
    fn rank(&self, query: &str, stanzas: &[LogStanza], k: usize) -> Vec<usize>;
}

/// 按查询词重合数打分的内置检索实现
///
/// 词按字母数字和下划线切分并转小写；分数相同时保持片段的原始顺序。
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordOverlapSearch;

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl SimilaritySearch for KeywordOverlapSearch {
    fn rank(&self, query: &str, stanzas: &[LogStanza], k: usize) -> Vec<usize> {
        let query_terms = terms(query);
        let mut scored: Vec<(usize, usize)> = stanzas
            .iter()
            .enumerate()
            .map(|(index, stanza)| {
                let stanza_terms = terms(&stanza.content());
                (index, query_terms.intersection(&stanza_terms).count())
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().take(k).map(|(index, _)| index).collect()
    }
}

/// 在一组日志文件的片段中检索与查询相关的内容
pub struct LogRetriever {
    stanzas: Vec<LogStanza>,
    search: Arc<dyn SimilaritySearch>,
    top_k: usize,
}

impl LogRetriever {
    pub fn new(stanzas: Vec<LogStanza>, search: Arc<dyn SimilaritySearch>) -> Self {
        Self {
            stanzas,
            search,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// 读取并切分所有文件，任一文件读取失败即返回错误
    pub fn from_files<P: AsRef<Path>>(
        files: &[P],
        search: Arc<dyn SimilaritySearch>,
    ) -> MonitorResult<Self> {
        let mut stanzas = Vec::new();
        for file in files {
            let segments = segment_file(file)?;
            debug!("{} 切分出 {} 个片段", file.as_ref().display(), segments.len());
            stanzas.extend(segments);
        }
        info!("从 {} 个文件建立 {} 个日志片段", files.len(), stanzas.len());
        Ok(Self::new(stanzas, search))
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn stanzas(&self) -> &[LogStanza] {
        &self.stanzas
    }

    pub fn retrieve(&self, query: &str) -> Vec<&LogStanza> {
        self.search
            .rank(query, &self.stanzas, self.top_k)
            .into_iter()
            .filter_map(|index| self.stanzas.get(index))
            .collect()
    }

    /// 检索结果的内容，以 `\n---\n` 连接
    pub fn retrieve_text(&self, query: &str) -> String {
        self.retrieve(query)
            .iter()
            .map(|stanza| stanza.content())
            .collect::<Vec<_>>()
            .join(RESULT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::segment_text;

    fn retriever(text: &str) -> LogRetriever {
        LogRetriever::new(segment_text("job.out", text), Arc::new(KeywordOverlapSearch))
    }

    #[test]
    fn test_keyword_ranking() {
        let r = retriever(
            "INFO starting isr\nWARN low memory\nERROR FileNotFoundError: missing calexp\nINFO done",
        );

        let hits = r.retrieve("FileNotFoundError calexp");
        assert_eq!(hits[0].content(), "ERROR FileNotFoundError: missing calexp");
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let r = retriever("INFO a\nINFO b\nINFO c\nINFO d").with_top_k(2);
        assert_eq!(r.retrieve_text("nothing matches"), "INFO a\n---\nINFO b");
    }

    #[test]
    fn test_empty_corpus() {
        let r = retriever("no tags here");
        assert!(r.stanzas().is_empty());
        assert_eq!(r.retrieve_text("anything"), "");
    }

    #[test]
    fn test_terms_case_insensitive() {
        let t = terms("Traceback: ValueError in lsst.pipe_base");
        assert!(t.contains("valueerror"));
        assert!(t.contains("pipe_base"));
        assert!(t.contains("lsst"));
    }
}
