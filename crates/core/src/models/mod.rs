pub mod attributes;
pub mod job_record;
pub mod job_status;
pub mod scheduler;
pub mod stanza;
pub mod workflow;

pub use attributes::{coerce_job_id, AttributeAccess, Attributes};
pub use job_record::{augment_job_record, JobRecord, SchedulerResults};
pub use job_status::{node_status_name, JobStatusRow, JobStatusTable, NodeStatusEntry, NodeStatusStore};
pub use scheduler::Scheduler;
pub use stanza::LogStanza;
pub use workflow::WorkflowParams;
