pub mod node_status;
pub mod scheduler;

pub use node_status::NodeStatusReader;
pub use scheduler::{QueryBackend, QueryRequest, SchedulerLocator};
