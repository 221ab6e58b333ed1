//! Mock gateway implementation for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, RwLock,
};
use std::time::Duration;
use time::OffsetDateTime;

use crate::domain::{
    models::{Break, CollectionId, EntryId, TimeEntry},
    transitions::{apply_local_transition, EntryAction},
    TimeEntryError,
};

use super::{AddBreakRequest, EntryGateway};

/// Mock entry gateway backed by an in-memory HashMap.
///
/// Emulates server behavior closely enough for service and coordinator
/// tests: unknown ids are NotFound, transitions are validated with the same
/// rules the real server enforces, and per-id artificial latency lets tests
/// force arbitrary completion orders.
#[derive(Clone, Default)]
pub struct MockEntryGateway {
    entries: Arc<RwLock<HashMap<EntryId, TimeEntry>>>,
    /// Ids that fail every call with a transient error.
    failing: Arc<RwLock<HashMap<EntryId, String>>>,
    /// Artificial per-id latency, to control completion order in tests.
    latency: Arc<RwLock<HashMap<EntryId, Duration>>>,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockEntryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the gateway with initial entries.
    pub fn with_entries(self, entries: Vec<TimeEntry>) -> Self {
        {
            let mut map = self.entries.write().unwrap();
            for entry in entries {
                map.insert(entry.id.clone(), entry);
            }
        }
        self
    }

    /// Make every call for `id` fail with a transient error.
    pub fn with_failure(self, id: impl Into<EntryId>, msg: impl Into<String>) -> Self {
        self.failing.write().unwrap().insert(id.into(), msg.into());
        self
    }

    /// Delay every call for `id` by `latency`.
    pub fn with_latency(self, id: impl Into<EntryId>, latency: Duration) -> Self {
        self.latency.write().unwrap().insert(id.into(), latency);
        self
    }

    /// Number of gateway calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Current snapshot of an entry, for test assertions.
    pub fn entry(&self, id: &EntryId) -> Option<TimeEntry> {
        self.entries.read().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    async fn begin_call(&self, id: &EntryId) -> Result<(), TimeEntryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.latency.read().unwrap().get(id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failing.read().unwrap().get(id).cloned();
        if let Some(msg) = failure {
            return Err(TimeEntryError::transient(msg));
        }

        Ok(())
    }
}

#[async_trait]
impl EntryGateway for MockEntryGateway {
    async fn fetch_entry(&self, id: &EntryId) -> Result<TimeEntry, TimeEntryError> {
        self.begin_call(id).await?;

        self.entries
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| TimeEntryError::NotFound(id.to_string()))
    }

    async fn apply_transition(
        &self,
        id: &EntryId,
        action: EntryAction,
    ) -> Result<TimeEntry, TimeEntryError> {
        self.begin_call(id).await?;

        let mut entries = self.entries.write().unwrap();
        let entry = entries
            .get(id)
            .ok_or_else(|| TimeEntryError::NotFound(id.to_string()))?;

        let next = apply_local_transition(entry, action, OffsetDateTime::now_utc())?;
        entries.insert(id.clone(), next.clone());

        Ok(next)
    }

    async fn delete_entry(&self, id: &EntryId) -> Result<(), TimeEntryError> {
        self.begin_call(id).await?;

        self.entries
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TimeEntryError::NotFound(id.to_string()))
    }

    async fn update_collections(
        &self,
        id: &EntryId,
        collections: &[CollectionId],
    ) -> Result<(), TimeEntryError> {
        self.begin_call(id).await?;

        let mut entries = self.entries.write().unwrap();
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| TimeEntryError::NotFound(id.to_string()))?;
        entry.collections = collections.to_vec();

        Ok(())
    }

    async fn request_metadata_refresh(&self, id: &EntryId) -> Result<(), TimeEntryError> {
        self.begin_call(id).await?;

        if self.entries.read().unwrap().contains_key(id) {
            Ok(())
        } else {
            Err(TimeEntryError::NotFound(id.to_string()))
        }
    }

    async fn add_break(
        &self,
        id: &EntryId,
        request: &AddBreakRequest,
    ) -> Result<TimeEntry, TimeEntryError> {
        self.begin_call(id).await?;

        let mut entries = self.entries.write().unwrap();
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| TimeEntryError::NotFound(id.to_string()))?;

        let break_id = format!("{}-break-{}", id, entry.breaks.len() + 1);
        let mut b = Break::new(break_id, request.started_at)
            .with_end(request.ended_at)
            .with_duration((request.ended_at - request.started_at).whole_seconds());
        b.description = request.description.clone();
        entry.breaks.push(b);

        Ok(entry.clone())
    }
}
