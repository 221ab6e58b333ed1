//! Once-per-second reconciliation of the visible elapsed-time clock.
//!
//! The ticker never touches the network: each tick hands the current
//! instant to the callback, which recomputes display values from the
//! last-confirmed snapshots via the duration model.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to one live tick loop. Aborting it (explicitly or on drop) stops
/// the loop without affecting any other handle.
#[derive(Debug)]
pub struct TickerHandle {
    task: JoinHandle<()>,
}

impl TickerHandle {
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Drives a periodic redraw callback while entries are on screen.
///
/// Owns at most one live handle: starting again implicitly stops the
/// previous loop first, and stopping (or dropping the ticker) leaves no
/// timer behind. Ticks run sequentially on one task and missed ticks are
/// coalesced, so a slow callback can never make two ticks overlap.
#[derive(Debug)]
pub struct ReconciliationTicker {
    period: Duration,
    handle: Option<TickerHandle>,
}

impl Default for ReconciliationTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationTicker {
    pub fn new() -> Self {
        Self {
            period: TICK_PERIOD,
            handle: None,
        }
    }

    /// Override the one-second period, mainly for tests.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    /// Start ticking, replacing any previous loop.
    ///
    /// `on_tick` receives the current instant once per period, plus once
    /// immediately so the display refreshes without a one-second lag. It is
    /// called synchronously and is expected to be cheap (proportional to
    /// the number of visible entries).
    pub fn start<F>(&mut self, mut on_tick: F)
    where
        F: FnMut(OffsetDateTime) + Send + 'static,
    {
        self.stop();

        let period = self.period;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                on_tick(OffsetDateTime::now_utc());
            }
        });

        self.handle = Some(TickerHandle { task });
    }

    /// Stop the live loop, if any. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.task.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for ReconciliationTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
