use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{
    models::{CollectionId, EntryId, TimeEntry},
    transitions::EntryAction,
    TimeEntryError,
};

/// Request to record a finished break on an entry.
///
/// `ended_at` must come after `started_at`; the core validates this before
/// the gateway is ever called.
#[derive(Debug, Clone)]
pub struct AddBreakRequest {
    pub started_at: OffsetDateTime,
    pub ended_at: OffsetDateTime,
    pub description: Option<String>,
}

impl AddBreakRequest {
    pub fn new(started_at: OffsetDateTime, ended_at: OffsetDateTime) -> Self {
        Self {
            started_at,
            ended_at,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Outbound port for the remote time entry service.
///
/// This trait defines the contract any remote provider must implement.
/// Transport details (HTTP verbs, headers, auth, JSON shapes) live in the
/// adapter, never here. Every method is a single remote round trip; the
/// adapter's own timeout surfaces as [`TimeEntryError::Transient`].
#[async_trait]
pub trait EntryGateway: Send + Sync + 'static {
    /// Fetch the current snapshot of an entry, breaks included.
    async fn fetch_entry(&self, id: &EntryId) -> Result<TimeEntry, TimeEntryError>;

    /// Ask the server to apply a lifecycle transition.
    ///
    /// Returns the confirmed post-transition snapshot. The server enforces
    /// the same legality rules as the local state machine.
    async fn apply_transition(
        &self,
        id: &EntryId,
        action: EntryAction,
    ) -> Result<TimeEntry, TimeEntryError>;

    /// Delete an entry. Deleting an already-deleted id is a NotFound
    /// failure, not corruption.
    async fn delete_entry(&self, id: &EntryId) -> Result<(), TimeEntryError>;

    /// Replace the set of collections an entry belongs to.
    async fn update_collections(
        &self,
        id: &EntryId,
        collections: &[CollectionId],
    ) -> Result<(), TimeEntryError>;

    /// Ask the server to re-derive an entry's metadata.
    async fn request_metadata_refresh(&self, id: &EntryId) -> Result<(), TimeEntryError>;

    /// Record a finished break on an entry; returns the updated snapshot.
    async fn add_break(
        &self,
        id: &EntryId,
        request: &AddBreakRequest,
    ) -> Result<TimeEntry, TimeEntryError>;
}
