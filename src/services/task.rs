//! Background tasks bound to the scope of their owner.
//!
//! A [`ScopedTask`] owns a spawned tokio task. Dropping the guard aborts
//! the task, so it can never outlive the state it touches. The task may be
//! timer driven ([`ScopedTask::every`]) or driven by anything else.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Shortest period a timer loop will run at. `tokio::time::interval`
/// panics on a zero period.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Clamp `period` to at least [`MIN_PERIOD`].
pub fn clamp_period(period: Duration) -> Duration {
    period.max(MIN_PERIOD)
}

/// Guard for a spawned task; aborts it on drop.
#[derive(Debug)]
pub struct ScopedTask {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl ScopedTask {
    /// Spawn an arbitrary future under a cancellation guard.
    pub fn spawn<F>(name: &'static str, fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(task = name, "starting loop");
        Self {
            name,
            handle: Some(tokio::spawn(fut)),
        }
    }

    /// Run `tick` every `period`, first firing one period after spawn.
    /// A zero period is clamped to [`MIN_PERIOD`].
    pub fn every<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = clamp_period(period);
        Self::spawn(name, async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tick().await;
            }
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the loop has exited on its own or been aborted.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Abort the loop and wait until it has stopped.
    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
            info!(task = self.name, "loop stopped");
        }
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(task = self.name, "loop aborted on drop");
        }
    }
}
