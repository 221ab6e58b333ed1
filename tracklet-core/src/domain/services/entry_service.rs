use std::sync::Arc;

use tracing::instrument;

use crate::domain::{
    models::{EntryId, TimeEntry},
    ports::outbound::{AddBreakRequest, EntryGateway},
    transitions::{apply_local_transition, EntryAction},
    TimeEntryError,
};

/// Single-entry orchestration over the gateway.
///
/// Pre-validates everything the core can check locally, so stale-UI errors
/// surface synchronously and distinctly from connectivity failures, then
/// delegates to the gateway. The snapshot a caller holds stays authoritative
/// until a method here returns the gateway-confirmed replacement; nothing is
/// advanced optimistically.
pub struct EntryService<G> {
    gateway: Arc<G>,
}

impl<G> Clone for EntryService<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G: EntryGateway> EntryService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn fetch_entry(&self, id: &EntryId) -> Result<TimeEntry, TimeEntryError> {
        self.gateway.fetch_entry(id).await
    }

    /// Request a lifecycle transition for `entry`.
    ///
    /// The transition is validated against the local snapshot first; an
    /// illegal request never reaches the network. On success the returned
    /// snapshot is the server-confirmed state and should replace the
    /// caller's copy.
    #[instrument(name = "EntryService::request_transition", skip(self, entry), fields(entry_id = %entry.id, action = %action))]
    pub async fn request_transition(
        &self,
        entry: &TimeEntry,
        action: EntryAction,
    ) -> Result<TimeEntry, TimeEntryError> {
        // Validation only; the provisional snapshot is discarded and the
        // confirmed one comes back from the server.
        apply_local_transition(entry, action, time::OffsetDateTime::now_utc())?;

        let confirmed = self.gateway.apply_transition(&entry.id, action).await?;
        tracing::debug!(status = %confirmed.status, "transition confirmed");

        Ok(confirmed)
    }

    /// Record a finished break on an entry.
    ///
    /// Rejects `ended_at <= started_at` before any remote call is made.
    #[instrument(name = "EntryService::add_break", skip(self, request), fields(entry_id = %id))]
    pub async fn add_break(
        &self,
        id: &EntryId,
        request: &AddBreakRequest,
    ) -> Result<TimeEntry, TimeEntryError> {
        if request.ended_at <= request.started_at {
            return Err(TimeEntryError::InvalidBreakRange);
        }

        self.gateway.add_break(id, request).await
    }

    pub async fn delete_entry(&self, id: &EntryId) -> Result<(), TimeEntryError> {
        self.gateway.delete_entry(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EntryStatus;
    use crate::domain::ports::outbound::MockEntryGateway;
    use time::macros::datetime;
    use time::Duration;

    const T0: time::OffsetDateTime = datetime!(2026-03-01 08:00:00 UTC);

    #[tokio::test]
    async fn illegal_transition_never_reaches_the_gateway() {
        let stopped = TimeEntry::new("e1", T0).with_status(EntryStatus::Stopped);
        let gateway = Arc::new(MockEntryGateway::new().with_entries(vec![stopped.clone()]));
        let service = EntryService::new(Arc::clone(&gateway));

        let err = service
            .request_transition(&stopped, EntryAction::Pause)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn transition_returns_confirmed_snapshot() {
        let running = TimeEntry::new("e1", T0);
        let gateway = Arc::new(MockEntryGateway::new().with_entries(vec![running.clone()]));
        let service = EntryService::new(Arc::clone(&gateway));

        let confirmed = service
            .request_transition(&running, EntryAction::Pause)
            .await
            .unwrap();

        assert_eq!(confirmed.status, EntryStatus::Paused);
        assert_eq!(gateway.entry(&running.id).unwrap().status, EntryStatus::Paused);
    }

    #[tokio::test]
    async fn gateway_failure_leaves_local_snapshot_untouched() {
        let running = TimeEntry::new("e1", T0);
        let gateway = Arc::new(
            MockEntryGateway::new()
                .with_entries(vec![running.clone()])
                .with_failure("e1", "connection reset"),
        );
        let service = EntryService::new(gateway);

        let err = service
            .request_transition(&running, EntryAction::Pause)
            .await
            .unwrap_err();

        assert!(err.is_transient());
        // Caller keeps rendering from the last-confirmed snapshot.
        assert_eq!(running.status, EntryStatus::Running);
    }

    #[tokio::test]
    async fn add_break_rejects_inverted_range_locally() {
        let gateway = Arc::new(MockEntryGateway::new());
        let service = EntryService::new(Arc::clone(&gateway));

        let request = AddBreakRequest::new(T0 + Duration::minutes(10), T0);
        let err = service
            .add_break(&EntryId::new("e1"), &request)
            .await
            .unwrap_err();

        assert!(matches!(err, TimeEntryError::InvalidBreakRange));
        assert_eq!(gateway.call_count(), 0);

        // Zero-length breaks are rejected too.
        let request = AddBreakRequest::new(T0, T0);
        assert!(service.add_break(&EntryId::new("e1"), &request).await.is_err());
    }

    #[tokio::test]
    async fn add_break_appends_to_entry() {
        let running = TimeEntry::new("e1", T0);
        let gateway = Arc::new(MockEntryGateway::new().with_entries(vec![running.clone()]));
        let service = EntryService::new(gateway);

        let request = AddBreakRequest::new(T0 + Duration::minutes(1), T0 + Duration::minutes(2))
            .with_description("coffee");
        let updated = service.add_break(&running.id, &request).await.unwrap();

        assert_eq!(updated.breaks.len(), 1);
        assert_eq!(updated.breaks[0].duration, Some(60));
        assert_eq!(updated.breaks[0].description.as_deref(), Some("coffee"));
    }

    #[tokio::test]
    async fn fetch_missing_entry_is_not_found() {
        let service = EntryService::new(Arc::new(MockEntryGateway::new()));

        let err = service.fetch_entry(&EntryId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, TimeEntryError::NotFound(_)));
    }
}
