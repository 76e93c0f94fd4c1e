//! One-second countdown driver for an [`ExamRun`].
//!
//! The ticker owns a `tokio` interval. Whoever holds it holds the timer:
//! dropping the ticker (or the future polling it) stops the countdown.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::debug;

use bda_core::model::ExamOutcome;
use bda_core::session::TickOutcome;

use super::run::ExamRun;

/// Countdown resolution.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct SessionTicker {
    interval: Interval,
}

impl SessionTicker {
    /// A ticker whose first tick fires one period from now.
    #[must_use]
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        // A stalled UI thread must not replay a burst of ticks.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Resolves at the next period boundary.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

impl Default for SessionTicker {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticks `run` until its countdown reaches zero or it finishes some other way.
///
/// Returns `NoAttempt` if the run was never started.
pub async fn drive_until_expired(run: &mut ExamRun, ticker: &mut SessionTicker) -> ExamOutcome {
    loop {
        if run.is_finished() {
            return run.outcome();
        }
        ticker.tick().await;
        match run.tick() {
            TickOutcome::Running { .. } => {}
            TickOutcome::Expired(result) => return ExamOutcome::Completed(result),
            TickOutcome::Idle => {
                debug!(run = %run.id(), "ticker stopped on idle run");
                return run.outcome();
            }
        }
    }
}
