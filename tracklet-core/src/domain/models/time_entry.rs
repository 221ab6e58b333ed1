use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{BreakId, CollectionId, EntryId};

/// Lifecycle status of a tracked work session.
///
/// `Completed` is terminal; `Stopped` can still transition to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Running,
    Paused,
    Stopped,
    Completed,
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Running => write!(f, "running"),
            EntryStatus::Paused => write!(f, "paused"),
            EntryStatus::Stopped => write!(f, "stopped"),
            EntryStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "running" => Ok(EntryStatus::Running),
            "paused" => Ok(EntryStatus::Paused),
            "stopped" => Ok(EntryStatus::Stopped),
            "completed" => Ok(EntryStatus::Completed),
            _ => Err(format!("Unknown entry status: {}", s)),
        }
    }
}

/// A break interval within a time entry.
///
/// An absent `ended_at` means the break is still ongoing. When the server
/// supplies a cached `duration` it is authoritative and preferred over
/// recomputing from the timestamps, to tolerate server-side rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Break {
    pub id: BreakId,
    pub started_at: OffsetDateTime,
    pub ended_at: Option<OffsetDateTime>,
    /// Cached duration in whole seconds.
    pub duration: Option<i64>,
    pub description: Option<String>,
}

impl Break {
    pub fn new(id: impl Into<BreakId>, started_at: OffsetDateTime) -> Self {
        Self {
            id: id.into(),
            started_at,
            ended_at: None,
            duration: None,
            description: None,
        }
    }

    pub fn with_end(mut self, ended_at: OffsetDateTime) -> Self {
        self.ended_at = Some(ended_at);
        self
    }

    pub fn with_duration(mut self, seconds: i64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// A break with neither an end timestamp nor a cached duration is
    /// still running.
    pub fn is_ongoing(&self) -> bool {
        self.ended_at.is_none() && self.duration.is_none()
    }
}

/// Read-only snapshot of a remotely owned time entry.
///
/// The authoritative copy lives on the server; the core holds the snapshot
/// from the most recent confirmed fetch or transition. `total_duration` is
/// accumulated seconds as of the last pause/stop boundary and never includes
/// time elapsed since `last_resumed_at` while Running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: EntryId,
    pub status: EntryStatus,
    pub total_duration: i64,
    pub started_at: OffsetDateTime,
    /// Instant of the most recent resume, or `started_at` if never paused.
    /// Meaningful only while Running.
    pub last_resumed_at: OffsetDateTime,
    pub paused_at: Option<OffsetDateTime>,
    pub stopped_at: Option<OffsetDateTime>,
    pub completed_at: Option<OffsetDateTime>,
    /// Insertion order is chronological.
    pub breaks: Vec<Break>,
    pub description: Option<String>,
    pub collections: Vec<CollectionId>,
}

impl TimeEntry {
    /// A freshly started entry, Running since `started_at`.
    pub fn new(id: impl Into<EntryId>, started_at: OffsetDateTime) -> Self {
        Self {
            id: id.into(),
            status: EntryStatus::Running,
            total_duration: 0,
            started_at,
            last_resumed_at: started_at,
            paused_at: None,
            stopped_at: None,
            completed_at: None,
            breaks: Vec::new(),
            description: None,
            collections: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_total_duration(mut self, seconds: i64) -> Self {
        self.total_duration = seconds;
        self
    }

    pub fn with_breaks(mut self, breaks: Vec<Break>) -> Self {
        self.breaks = breaks;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_collections(mut self, collections: Vec<CollectionId>) -> Self {
        self.collections = collections;
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, EntryStatus::Running | EntryStatus::Paused)
    }

    /// The break currently in progress, if any. The server enforces at most
    /// one; the snapshot tolerates more and reports the first.
    pub fn ongoing_break(&self) -> Option<&Break> {
        self.breaks.iter().find(|b| b.is_ongoing())
    }
}
