//! Fixed-period polling with explicit lifecycle.
//!
//! Each dashboard view owns its poller: the fetch runs immediately on
//! start, then on every tick, and stops when the handle is dropped. The
//! [`Generation`] counter lets a view discard responses from requests it
//! has since superseded (rapid meter reselection).

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to a running poller. Cancels the task on `stop()` or drop.
pub struct PollHandle {
    cancel: CancellationToken,
}

impl PollHandle {
    pub fn stop(self) {
        self.cancel.cancel();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a repeating task: run `task` now, then every `period`. The task is
/// responsible for its own error handling; a failed run is simply retried
/// on the next tick.
pub fn spawn<F, Fut>(period: Duration, mut task: F) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            // biased so a cancelled poller never runs one extra tick
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = task() => {}
            }
        }
    });

    PollHandle { cancel }
}

/// Monotonic request generation for discarding stale responses. A view
/// calls [`Generation::begin`] before issuing a request and checks
/// [`Generation::is_current`] before applying the response.
#[derive(Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    /// Start a new request generation, superseding all earlier ones.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) == generation
    }
}
