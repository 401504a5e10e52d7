//! # Condor Monitor Testing Utils
//!
//! Shared testing utilities for the workflow monitor workspace.
//!
//! - **Mock backends**: in-memory `QueryBackend`, `SchedulerLocator` and
//!   `NodeStatusReader` implementations with failure and delay injection
//! - **Builders**: job records, node-status entries and scheduler lists
//! - **Helpers**: temporary submit directories with the job log layout
//!
//! ```toml
//! [dev-dependencies]
//! condor-monitor-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod helpers;
pub mod mocks;

pub use builders::*;
pub use helpers::*;
pub use mocks::*;
