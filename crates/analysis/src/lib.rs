//! 作业状态提取与日志诊断
//!
//! 从工作流的节点状态存储生成作业状态表，按作业定位日志文件，
//! 并把日志切分为以级别标签开头的片段供检索和摘要使用。

pub mod finder;
pub mod job_status;
pub mod predicate;
pub mod retriever;
pub mod segmenter;
pub mod summary;
pub mod tools;

pub use finder::LogFileFinder;
pub use job_status::{status_row, JobStatusExtractor};
pub use predicate::Predicate;
pub use retriever::{KeywordOverlapSearch, LogRetriever, SimilaritySearch};
pub use segmenter::{is_tag_line, segment, segment_file, segment_text, TAG_PREFIXES};
pub use summary::{LogSummaryExtractor, FALLBACK_LINES};
pub use tools::AgentTools;
