//! One-shot, re-armable tick deadline owned by the engine runner

use std::{future, pin::Pin, time::Duration};
use tokio::time::{sleep, sleep_until, Instant, Sleep};
use tracing::debug;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Holds at most one pending tick.
///
/// Arming replaces any pending deadline and cancelling drops it, so a
/// cancelled tick can never fire. Only the owner polls `fired`.
#[derive(Debug)]
pub struct TickSource {
    period: Duration,
    deadline: Option<Pin<Box<Sleep>>>,
    /// Deadline of the tick that fired last, anchor for `arm_next`
    last_fired: Option<Instant>,
}

impl TickSource {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
            last_fired: None,
        }
    }

    /// Schedule the next tick one period from now, replacing any pending one
    pub fn arm(&mut self) {
        if self.deadline.is_some() {
            debug!("Re-arming tick, pending deadline dropped");
        }
        self.last_fired = None;
        self.deadline = Some(Box::pin(sleep(self.period)));
    }

    /// Schedule the tick following the one that just fired, one period after
    /// its deadline so handling latency does not accumulate. Falls back to
    /// `arm` when no tick has fired since the last arm or cancel.
    pub fn arm_next(&mut self) {
        match self.last_fired {
            Some(previous) => {
                self.deadline = Some(Box::pin(sleep_until(previous + self.period)));
            }
            None => self.arm(),
        }
    }

    pub fn cancel(&mut self) {
        self.last_fired = None;
        if self.deadline.take().is_some() {
            debug!("Tick cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolves when the armed tick is due, disarming it. Pending forever
    /// while nothing is armed.
    pub async fn fired(&mut self) {
        match self.deadline.as_mut() {
            Some(deadline) => {
                deadline.as_mut().await;
                self.last_fired = Some(deadline.deadline());
                self.deadline = None;
            }
            None => future::pending().await,
        }
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_arm() {
        let mut ticks = TickSource::default();
        let started = Instant::now();

        ticks.arm();
        ticks.fired().await;

        assert!(started.elapsed() >= TICK_PERIOD);
        assert!(started.elapsed() < TICK_PERIOD + Duration::from_millis(5));
        assert!(!ticks.is_armed());
        assert!(timeout(Duration::from_secs(5), ticks.fired()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_tick_never_fires() {
        let mut ticks = TickSource::default();
        ticks.arm();
        ticks.cancel();

        assert!(!ticks.is_armed());
        assert!(timeout(Duration::from_secs(3), ticks.fired()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_restarts_the_period() {
        let mut ticks = TickSource::default();
        ticks.arm();
        tokio::time::advance(Duration::from_millis(600)).await;

        let rearmed_at = Instant::now();
        ticks.arm();
        ticks.fired().await;

        assert!(rearmed_at.elapsed() >= TICK_PERIOD);
        assert!(rearmed_at.elapsed() < TICK_PERIOD + Duration::from_millis(5));
        assert!(timeout(Duration::from_secs(3), ticks.fired()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn steady_ticks_do_not_accumulate_handling_delay() {
        let mut ticks = TickSource::default();
        let started = Instant::now();

        ticks.arm();
        for _ in 0..3 {
            ticks.fired().await;
            tokio::time::advance(Duration::from_millis(300)).await;
            ticks.arm_next();
        }
        ticks.fired().await;

        assert!(started.elapsed() >= TICK_PERIOD * 4);
        assert!(started.elapsed() < TICK_PERIOD * 4 + Duration::from_millis(5));
    }

    #[tokio::test(start_paused = true)]
    async fn arm_next_after_cancel_starts_a_fresh_period() {
        let mut ticks = TickSource::default();
        ticks.arm();
        ticks.fired().await;
        ticks.cancel();

        tokio::time::advance(Duration::from_secs(5)).await;
        let resumed_at = Instant::now();
        ticks.arm_next();
        ticks.fired().await;

        assert!(resumed_at.elapsed() >= TICK_PERIOD);
        assert!(resumed_at.elapsed() < TICK_PERIOD + Duration::from_millis(5));
    }
}
