//! Lifecycle transitions for a [`TimeEntry`] snapshot.
//!
//! The functions here only compute the *intended* next snapshot. Committing
//! a transition is a gateway call; callers must keep using the
//! last-confirmed snapshot until the gateway reports success.

use time::OffsetDateTime;

use crate::domain::{
    models::{EntryStatus, TimeEntry},
    TimeEntryError,
};

/// A lifecycle action a caller can request on an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EntryAction {
    Pause,
    Resume,
    Stop,
    Complete,
}

impl EntryAction {
    pub const ALL: [EntryAction; 4] = [
        EntryAction::Pause,
        EntryAction::Resume,
        EntryAction::Stop,
        EntryAction::Complete,
    ];
}

pub fn can_pause(entry: &TimeEntry) -> bool {
    entry.status == EntryStatus::Running
}

pub fn can_resume(entry: &TimeEntry) -> bool {
    entry.status == EntryStatus::Paused
}

pub fn can_stop(entry: &TimeEntry) -> bool {
    matches!(entry.status, EntryStatus::Running | EntryStatus::Paused)
}

pub fn can_complete(entry: &TimeEntry) -> bool {
    entry.status == EntryStatus::Stopped
}

/// The actions currently legal for `entry`, in declaration order.
pub fn legal_actions(entry: &TimeEntry) -> Vec<EntryAction> {
    EntryAction::ALL
        .into_iter()
        .filter(|action| is_legal(entry, *action))
        .collect()
}

fn is_legal(entry: &TimeEntry, action: EntryAction) -> bool {
    match action {
        EntryAction::Pause => can_pause(entry),
        EntryAction::Resume => can_resume(entry),
        EntryAction::Stop => can_stop(entry),
        EntryAction::Complete => can_complete(entry),
    }
}

/// Compute the snapshot `entry` would become if `action` were applied at
/// `now`.
///
/// Total over every (status, action) pair: either a valid next snapshot or
/// [`TimeEntryError::IllegalTransition`], never a silent no-op. Pausing or
/// stopping a Running entry freezes `total_duration` up to `now`; stopping
/// a Paused entry leaves the already-frozen total untouched.
pub fn apply_local_transition(
    entry: &TimeEntry,
    action: EntryAction,
    now: OffsetDateTime,
) -> Result<TimeEntry, TimeEntryError> {
    if !is_legal(entry, action) {
        return Err(TimeEntryError::IllegalTransition {
            status: entry.status,
            action,
        });
    }

    let mut next = entry.clone();
    match action {
        EntryAction::Pause => {
            next.total_duration += (now - entry.last_resumed_at).whole_seconds().max(0);
            next.paused_at = Some(now);
            next.status = EntryStatus::Paused;
        }
        EntryAction::Resume => {
            next.last_resumed_at = now;
            next.status = EntryStatus::Running;
        }
        EntryAction::Stop => {
            if entry.status == EntryStatus::Running {
                next.total_duration += (now - entry.last_resumed_at).whole_seconds().max(0);
            }
            next.stopped_at = Some(now);
            next.status = EntryStatus::Stopped;
        }
        EntryAction::Complete => {
            next.completed_at = Some(now);
            next.status = EntryStatus::Completed;
        }
    }

    Ok(next)
}
