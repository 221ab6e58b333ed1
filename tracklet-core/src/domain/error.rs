use thiserror::Error;

use crate::domain::{models::EntryStatus, transitions::EntryAction};

/// Errors that can occur during time entry operations.
#[derive(Debug, Error)]
pub enum TimeEntryError {
    /// The requested lifecycle transition is not legal from the entry's
    /// current status. Indicates stale UI state, not a connectivity problem.
    #[error("cannot {action} an entry that is {status}")]
    IllegalTransition {
        status: EntryStatus,
        action: EntryAction,
    },
    #[error("break must end after it starts")]
    InvalidBreakRange,
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("transient gateway failure: {0}")]
    Transient(String),
}

impl TimeEntryError {
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// True for errors detected locally before any remote call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::IllegalTransition { .. } | Self::InvalidBreakRange
        )
    }

    /// True for network/server failures that a caller may choose to retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
