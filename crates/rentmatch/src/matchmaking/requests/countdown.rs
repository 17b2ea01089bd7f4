use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::policy::Countdown;

/// Once-per-second republisher of a tenant's deactivation countdown.
///
/// Each tick re-derives the decomposition from the fixed `deactivation_at`
/// and the current clock, never by decrementing a counter, so the display
/// cannot accumulate drift. Dropping the ticker aborts the task: the timer
/// handle is a scoped resource released on navigation away.
pub struct CountdownTicker {
    rx: watch::Receiver<Countdown>,
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    pub fn start(deactivation_at: DateTime<Utc>) -> Self {
        Self::start_with_clock(deactivation_at, Utc::now)
    }

    /// Variant with an injected clock so tests control the wall time.
    pub fn start_with_clock<C>(deactivation_at: DateTime<Utc>, clock: C) -> Self
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
    {
        let (tx, rx) = watch::channel(Countdown::until(deactivation_at, clock()));
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                if tx.send(Countdown::until(deactivation_at, clock())).is_err() {
                    break;
                }
            }
        });

        Self { rx, handle }
    }

    pub fn subscribe(&self) -> watch::Receiver<Countdown> {
        self.rx.clone()
    }

    pub fn latest(&self) -> Countdown {
        *self.rx.borrow()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
