//! Recurring description re-apply timer
//!
//! The host page periodically re-renders its rows wholesale, discarding any
//! description we inserted. Each visible row therefore owns one of these
//! timers, which re-runs its callback every period until cancelled.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest accepted period; `tokio::time::interval` rejects zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a recurring task. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct ReapplyTimer {
    cancellation: CancellationToken,
    task: JoinHandle<()>,
}

impl ReapplyTimer {
    /// Spawn a timer on `runtime` that calls `tick` every `period`.
    ///
    /// The first call happens one full period after spawning, not immediately.
    /// A zero period is raised to one millisecond.
    pub fn spawn<F>(runtime: &Handle, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let period = period.max(MIN_PERIOD);
        let cancellation = CancellationToken::new();
        let cancelled = cancellation.clone();

        let task = runtime.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await; // Skip first immediate tick

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => tick(),
                }
            }
        });

        Self { cancellation, task }
    }

    /// Stop the timer. No further ticks are delivered.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ReapplyTimer {
    fn drop(&mut self) {
        self.cancellation.cancel();
        self.task.abort();
    }
}
