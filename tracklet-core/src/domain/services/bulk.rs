use std::collections::HashMap;
use std::sync::Arc;

use futures::{stream, StreamExt};
use tracing::instrument;

use crate::domain::{
    models::{BulkAction, BulkOutcome, BulkProgress, BulkSummary, EntryId},
    ports::outbound::EntryGateway,
    transitions::EntryAction,
    TimeEntryError,
};

/// In-flight cap for per-entry gateway calls. Sized to a typical client
/// connection pool, not a correctness requirement.
const DEFAULT_MAX_IN_FLIGHT: usize = 10;

/// Applies one action to a set of entries with bounded concurrency.
///
/// Pure fan-out/fan-in: exactly one gateway call per id, no dependency
/// between calls, no retries. Results are folded on a single consumer, so
/// the progress counter and outcome map never race. A per-entry failure
/// never aborts its siblings; the operation always runs to a terminal
/// [`BulkSummary`]. Dropping the returned future abandons the operation
/// cleanly, discarding in-flight results.
pub struct BulkCoordinator<G> {
    gateway: Arc<G>,
    max_in_flight: usize,
}

impl<G> Clone for BulkCoordinator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            max_in_flight: self.max_in_flight,
        }
    }
}

impl<G: EntryGateway> BulkCoordinator<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Run `action` against every id, invoking `on_progress` once per
    /// resolved call with a strictly increasing `completed` count.
    ///
    /// Callers pass a non-empty, deduplicated id set; an empty set is
    /// tolerated and yields an empty terminal summary immediately.
    #[instrument(name = "BulkCoordinator::run", skip(self, ids, on_progress), fields(action = %action, total = ids.len()))]
    pub async fn run<F>(&self, ids: Vec<EntryId>, action: BulkAction, mut on_progress: F) -> BulkSummary
    where
        F: FnMut(BulkProgress),
    {
        let total = ids.len();
        let mut outcomes: HashMap<EntryId, BulkOutcome> = HashMap::with_capacity(total);

        let mut results = stream::iter(ids)
            .map(|id| {
                let gateway = Arc::clone(&self.gateway);
                let action = action.clone();
                async move {
                    let result = apply_one(gateway.as_ref(), &id, &action).await;
                    (id, result)
                }
            })
            .buffer_unordered(self.max_in_flight);

        // Single fan-in consumer: arrival order is unspecified, but the
        // counter increments and the outcome map fills without contention.
        let mut completed = 0;
        while let Some((id, result)) = results.next().await {
            completed += 1;
            let outcome = match result {
                Ok(()) => BulkOutcome::Succeeded,
                Err(err) => {
                    tracing::debug!(entry_id = %id, %err, "bulk call failed");
                    BulkOutcome::Failed(err)
                }
            };
            outcomes.insert(id, outcome);
            on_progress(BulkProgress { completed, total });
        }

        let mut summary = BulkSummary::default();
        for (id, outcome) in outcomes {
            if outcome.is_success() {
                summary.succeeded_ids.insert(id);
            } else {
                summary.failed_count += 1;
            }
        }

        if summary.failed_count > 0 {
            tracing::warn!(
                failed = summary.failed_count,
                succeeded = summary.succeeded_ids.len(),
                "bulk operation finished with failures"
            );
        }

        summary
    }
}

async fn apply_one<G: EntryGateway>(
    gateway: &G,
    id: &EntryId,
    action: &BulkAction,
) -> Result<(), TimeEntryError> {
    match action {
        BulkAction::Delete => gateway.delete_entry(id).await,
        BulkAction::Reassign(collections) => gateway.update_collections(id, collections).await,
        BulkAction::RefreshMetadata => gateway.request_metadata_refresh(id).await,
        BulkAction::Stop => gateway
            .apply_transition(id, EntryAction::Stop)
            .await
            .map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CollectionId, EntryStatus, TimeEntry};
    use crate::domain::ports::outbound::MockEntryGateway;
    use std::time::Duration;
    use time::macros::datetime;

    const T0: time::OffsetDateTime = datetime!(2026-03-01 08:00:00 UTC);

    fn seeded_gateway(ids: &[&str]) -> MockEntryGateway {
        let entries = ids.iter().map(|id| TimeEntry::new(*id, T0)).collect();
        MockEntryGateway::new().with_entries(entries)
    }

    fn entry_ids(ids: &[&str]) -> Vec<EntryId> {
        ids.iter().map(|id| EntryId::new(*id)).collect()
    }

    #[tokio::test]
    async fn delete_with_one_missing_id_reports_partial_failure() {
        // e3 was deleted elsewhere already.
        let gateway = Arc::new(seeded_gateway(&["e1", "e2", "e4", "e5"]));
        let coordinator = BulkCoordinator::new(Arc::clone(&gateway));

        let mut progress = Vec::new();
        let summary = coordinator
            .run(
                entry_ids(&["e1", "e2", "e3", "e4", "e5"]),
                BulkAction::Delete,
                |p| progress.push(p),
            )
            .await;

        assert_eq!(summary.succeeded_ids.len(), 4);
        assert_eq!(summary.failed_count, 1);
        assert!(!summary.succeeded_ids.contains(&EntryId::new("e3")));

        // Exactly one callback per id, strictly increasing, ending at total.
        let completed: Vec<usize> = progress.iter().map(|p| p.completed).collect();
        assert_eq!(completed, vec![1, 2, 3, 4, 5]);
        assert!(progress.iter().all(|p| p.total == 5));
        assert!(progress.last().unwrap().is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn aggregate_is_independent_of_completion_order() {
        // Reversed latencies force results to arrive back-to-front.
        let gateway = seeded_gateway(&["e1", "e2", "e3"])
            .with_latency("e1", Duration::from_millis(300))
            .with_latency("e2", Duration::from_millis(200))
            .with_latency("e3", Duration::from_millis(100))
            .with_failure("e2", "timeout");
        let coordinator = BulkCoordinator::new(Arc::new(gateway));

        let summary = coordinator
            .run(entry_ids(&["e1", "e2", "e3"]), BulkAction::RefreshMetadata, |_| {})
            .await;

        assert_eq!(summary.failed_count, 1);
        assert_eq!(
            summary.succeeded_ids,
            entry_ids(&["e1", "e3"]).into_iter().collect()
        );
    }

    #[tokio::test]
    async fn one_gateway_call_per_id() {
        let gateway = Arc::new(seeded_gateway(&["e1", "e2", "e3"]));
        let coordinator = BulkCoordinator::new(Arc::clone(&gateway)).with_max_in_flight(2);

        let summary = coordinator
            .run(entry_ids(&["e1", "e2", "e3"]), BulkAction::RefreshMetadata, |_| {})
            .await;

        assert!(summary.all_succeeded());
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn stop_counts_already_stopped_entries_as_failures() {
        let running = TimeEntry::new("e1", T0);
        let stopped = TimeEntry::new("e2", T0).with_status(EntryStatus::Stopped);
        let gateway = Arc::new(MockEntryGateway::new().with_entries(vec![running, stopped]));
        let coordinator = BulkCoordinator::new(Arc::clone(&gateway));

        let summary = coordinator
            .run(entry_ids(&["e1", "e2"]), BulkAction::Stop, |_| {})
            .await;

        assert_eq!(summary.succeeded_ids, entry_ids(&["e1"]).into_iter().collect());
        assert_eq!(summary.failed_count, 1);
        assert_eq!(
            gateway.entry(&EntryId::new("e1")).unwrap().status,
            EntryStatus::Stopped
        );
    }

    #[tokio::test]
    async fn reassign_rewrites_collection_membership() {
        let gateway = Arc::new(seeded_gateway(&["e1", "e2"]));
        let coordinator = BulkCoordinator::new(Arc::clone(&gateway));

        let collections = vec![CollectionId::new("work"), CollectionId::new("urgent")];
        let summary = coordinator
            .run(
                entry_ids(&["e1", "e2"]),
                BulkAction::Reassign(collections.clone()),
                |_| {},
            )
            .await;

        assert!(summary.all_succeeded());
        for id in entry_ids(&["e1", "e2"]) {
            assert_eq!(gateway.entry(&id).unwrap().collections, collections);
        }
    }

    #[tokio::test]
    async fn empty_id_set_terminates_immediately() {
        let gateway = Arc::new(MockEntryGateway::new());
        let coordinator = BulkCoordinator::new(Arc::clone(&gateway));

        let mut callbacks = 0;
        let summary = coordinator
            .run(Vec::new(), BulkAction::Delete, |_| callbacks += 1)
            .await;

        assert!(summary.succeeded_ids.is_empty());
        assert_eq!(summary.failed_count, 0);
        assert_eq!(callbacks, 0);
        assert_eq!(gateway.call_count(), 0);
    }
}
