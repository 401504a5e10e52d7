//! Mock implementations of the external collaborator traits
//!
//! All mocks are cheap to clone; clones share state so a test can keep a
//! handle for assertions after moving one into the code under test.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use condor_monitor_core::models::{JobRecord, NodeStatusStore, Scheduler};
use condor_monitor_core::traits::{NodeStatusReader, QueryBackend, QueryRequest, SchedulerLocator};
use condor_monitor_core::{MonitorError, MonitorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Live,
    History,
}

/// One call received by [`MockQueryBackend`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub scheduler: String,
    pub kind: CallKind,
    pub request: QueryRequest,
}

/// In-memory query backend keyed by scheduler name
#[derive(Debug, Clone, Default)]
pub struct MockQueryBackend {
    live: Arc<Mutex<HashMap<String, JobRecord>>>,
    history: Arc<Mutex<HashMap<String, JobRecord>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockQueryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_live(self, scheduler: &str, record: JobRecord) -> Self {
        self.live.lock().unwrap().insert(scheduler.to_string(), record);
        self
    }

    pub fn with_history(self, scheduler: &str, record: JobRecord) -> Self {
        self.history
            .lock()
            .unwrap()
            .insert(scheduler.to_string(), record);
        self
    }

    /// Every query against `scheduler` fails with an upstream error
    pub fn with_failure(self, scheduler: &str, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(scheduler.to_string(), message.to_string());
        self
    }

    /// Every query against `scheduler` sleeps before answering
    pub fn with_delay(self, scheduler: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(scheduler.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of simultaneously running queries observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn answer(
        &self,
        scheduler: &Scheduler,
        request: &QueryRequest,
        kind: CallKind,
    ) -> MonitorResult<JobRecord> {
        self.calls.lock().unwrap().push(RecordedCall {
            scheduler: scheduler.name.clone(),
            kind,
            request: request.clone(),
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlightGuard(&self.in_flight);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(&scheduler.name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failures.lock().unwrap().get(&scheduler.name) {
            return Err(MonitorError::upstream(&scheduler.name, message.clone()));
        }

        let source = match kind {
            CallKind::Live => &self.live,
            CallKind::History => &self.history,
        };
        let mut record = source
            .lock()
            .unwrap()
            .get(&scheduler.name)
            .cloned()
            .unwrap_or_default();

        if let Some(projection) = &request.projection {
            for attrs in record.values_mut() {
                attrs.retain(|key, _| projection.iter().any(|p| p == key));
            }
        }

        Ok(record)
    }
}

#[async_trait]
impl QueryBackend for MockQueryBackend {
    async fn query(
        &self,
        scheduler: &Scheduler,
        request: &QueryRequest,
    ) -> MonitorResult<JobRecord> {
        self.answer(scheduler, request, CallKind::Live).await
    }

    async fn history(
        &self,
        scheduler: &Scheduler,
        request: &QueryRequest,
    ) -> MonitorResult<JobRecord> {
        self.answer(scheduler, request, CallKind::History).await
    }
}

/// Scheduler discovery returning a fixed list
#[derive(Debug, Clone, Default)]
pub struct MockSchedulerLocator {
    schedulers: Vec<Scheduler>,
    failure: Option<String>,
}

impl MockSchedulerLocator {
    pub fn new(schedulers: Vec<Scheduler>) -> Self {
        Self {
            schedulers,
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            schedulers: Vec::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl SchedulerLocator for MockSchedulerLocator {
    async fn locate_all(&self) -> MonitorResult<Vec<Scheduler>> {
        match &self.failure {
            Some(message) => Err(MonitorError::upstream("collector", message.clone())),
            None => Ok(self.schedulers.clone()),
        }
    }
}

/// Node-status reader backed by a map of submit directory -> store
#[derive(Debug, Clone, Default)]
pub struct InMemoryNodeStatusReader {
    stores: Arc<Mutex<HashMap<PathBuf, NodeStatusStore>>>,
}

impl InMemoryNodeStatusReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store<P: Into<PathBuf>>(self, submit_dir: P, store: NodeStatusStore) -> Self {
        self.stores.lock().unwrap().insert(submit_dir.into(), store);
        self
    }
}

impl NodeStatusReader for InMemoryNodeStatusReader {
    fn read_node_status(&self, submit_dir: &Path) -> MonitorResult<NodeStatusStore> {
        self.stores
            .lock()
            .unwrap()
            .get(submit_dir)
            .cloned()
            .ok_or_else(|| MonitorError::NodeStatusUnavailable {
                path: submit_dir.display().to_string(),
                message: "no node status store registered".to_string(),
            })
    }
}
