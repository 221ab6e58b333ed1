use std::collections::HashSet;

use serde::Serialize;

use super::{CollectionId, EntryId};
use crate::domain::TimeEntryError;

/// An action applied uniformly to every entry in a bulk selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    Reassign(Vec<CollectionId>),
    RefreshMetadata,
    Stop,
}

impl std::fmt::Display for BulkAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BulkAction::Delete => write!(f, "delete"),
            BulkAction::Reassign(_) => write!(f, "reassign"),
            BulkAction::RefreshMetadata => write!(f, "refresh-metadata"),
            BulkAction::Stop => write!(f, "stop"),
        }
    }
}

/// Live progress of a bulk operation. `completed` only ever increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulkProgress {
    pub completed: usize,
    pub total: usize,
}

impl BulkProgress {
    pub fn is_terminal(&self) -> bool {
        self.completed == self.total
    }
}

/// Per-entry result of a bulk operation.
#[derive(Debug)]
pub enum BulkOutcome {
    Succeeded,
    Failed(TimeEntryError),
}

impl BulkOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BulkOutcome::Succeeded)
    }
}

/// Terminal aggregate of a bulk operation.
///
/// Valid only once every per-entry call has resolved; independent of the
/// order in which results arrived.
#[derive(Debug, Default)]
pub struct BulkSummary {
    pub succeeded_ids: HashSet<EntryId>,
    pub failed_count: usize,
}

impl BulkSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed_count == 0
    }
}
