//! Cancellable session timers.
//!
//! Each [`ScheduledEvent`] becomes a tokio task that sleeps for the
//! requested delay and then sends a [`FiredTimer`] over an unbounded
//! channel. All tasks share one [`CancellationToken`]; cancelling swaps in
//! a fresh token so later timers are unaffected.
//!
//! A task on another worker can pass its cancellation check and send just
//! after [`TimerSet::cancel_all`] drained the channel. Every delivery is
//! therefore tagged with the epoch it was armed in, and deliveries from an
//! earlier epoch are discarded on receipt without touching the pending
//! count.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::session::{FiredTimer, ScheduledEvent};

use super::clock::Clock;

/// The pending timers of one session.
#[derive(Debug)]
pub struct TimerSet {
    clock: Clock,
    cancel: CancellationToken,
    tx: mpsc::UnboundedSender<(u64, FiredTimer)>,
    rx: mpsc::UnboundedReceiver<(u64, FiredTimer)>,
    epoch: u64,
    pending: usize,
}

impl TimerSet {
    /// An empty set reading time from `clock`.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            clock,
            cancel: CancellationToken::new(),
            tx,
            rx,
            epoch: 0,
            pending: 0,
        }
    }

    /// Arms a timer for `scheduled`.
    pub fn arm(&mut self, scheduled: ScheduledEvent) {
        let token = self.cancel.clone();
        let tx = self.tx.clone();
        let clock = self.clock;
        let epoch = self.epoch;
        self.pending += 1;
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    trace!(kind = ?scheduled.kind, "timer cancelled");
                }
                () = tokio::time::sleep(scheduled.delay) => {
                    let _ = tx.send((epoch, scheduled.fire(clock.now())));
                }
            }
        });
    }

    /// Cancels every pending timer and drops fired-but-unread ones.
    pub fn cancel_all(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.epoch += 1;
        while self.rx.try_recv().is_ok() {}
        self.pending = 0;
    }

    /// Timers armed since the last cancel that have not been received.
    #[must_use]
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Waits for the next timer to fire.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn next(&mut self) -> Option<FiredTimer> {
        if self.pending == 0 {
            return None;
        }
        loop {
            let (epoch, fired) = self.rx.recv().await?;
            if epoch != self.epoch {
                trace!(kind = ?fired.kind, epoch, "dropping timer armed before cancel");
                continue;
            }
            self.pending -= 1;
            return Some(fired);
        }
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
