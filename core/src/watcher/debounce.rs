//! Debounce state machine and the loop that drives runs from it.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use super::fs::WatchSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Debouncing { deadline: Instant },
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    state: DebounceState,
}

impl Debouncer {
    /// Starts in `Debouncing` so one run happens shortly after startup even
    /// without any change.
    pub fn armed(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            state: DebounceState::Debouncing {
                deadline: now + interval,
            },
        }
    }

    pub fn idle(interval: Duration) -> Self {
        Self {
            interval,
            state: DebounceState::Idle,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Debouncing { deadline } => Some(deadline),
        }
    }

    /// A change (re)arms the timer from `now`.
    pub fn on_change(&mut self, now: Instant) {
        self.state = DebounceState::Debouncing {
            deadline: now + self.interval,
        };
    }

    /// Timer expiry. Returns true when a run should start.
    pub fn fire(&mut self) -> bool {
        match self.state {
            DebounceState::Idle => false,
            DebounceState::Debouncing { .. } => {
                self.state = DebounceState::Idle;
                true
            }
        }
    }
}

/// Coalesce `signals` into triggers and await `on_trigger` for each one.
/// No events are read while a trigger is being handled, so triggers never
/// overlap. Returns once the channel is closed and no trigger is pending.
pub async fn watch_loop<F, Fut>(
    mut signals: UnboundedReceiver<WatchSignal>,
    interval: Duration,
    mut on_trigger: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut debouncer = Debouncer::armed(interval, Instant::now());
    let mut closed = false;

    loop {
        let deadline = debouncer.deadline();
        if closed && deadline.is_none() {
            break;
        }

        tokio::select! {
            biased;

            maybe = signals.recv(), if !closed => match maybe {
                Some(WatchSignal::Changed(paths)) => {
                    trace!(target: "covwatch.watcher", paths = ?paths, "change");
                    debouncer.on_change(Instant::now());
                }
                Some(WatchSignal::Error(err)) => {
                    warn!(target: "covwatch.watcher", error = %err, "watcher error");
                }
                None => {
                    debug!(target: "covwatch.watcher", "signal channel closed");
                    closed = true;
                }
            },
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if debouncer.fire() {
                    debug!(target: "covwatch.watcher", "quiet period elapsed, starting run");
                    on_trigger().await;
                }
            }
        }
    }
}
